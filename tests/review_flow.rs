mod common;
use common::TestContext;
use entity::partnership::PartnershipStatus;
use entity::withdrawal_request::WithdrawalStatus;
use league_partnerships::types::error::AppError;
use league_partnerships::types::partnership::PartnershipQuery;
use league_partnerships::types::withdrawal::WithdrawalQuery;
use uuid::Uuid;

#[tokio::test]
async fn withdrawals_page_newest_first_with_totals() {
    let ctx = TestContext::new().await;
    let mut ids = Vec::new();
    for i in 0..5 {
        let (team, _captain, partner) = ctx.active_team(&format!("Captain {i}"), &format!("Partner {i}")).await;
        ids.push(ctx.engine.submit_withdrawal(team.id, partner, "relocating").await.unwrap().id);
    }
    ids.reverse();

    let first = ctx
        .review
        .list_withdrawals(&WithdrawalQuery { page_size: Some(2), ..Default::default() })
        .await
        .unwrap();
    assert_eq!((first.page, first.page_size, first.total_items, first.total_pages), (1, 2, 5, 3));
    assert_eq!(first.items.iter().map(|v| v.request.id).collect::<Vec<_>>(), ids[..2]);

    let last = ctx
        .review
        .list_withdrawals(&WithdrawalQuery { page: Some(3), page_size: Some(2), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(last.items.len(), 1);
    assert_eq!(last.items[0].request.id, ids[4]);

    let beyond = ctx
        .review
        .list_withdrawals(&WithdrawalQuery { page: Some(9), page_size: Some(2), ..Default::default() })
        .await
        .unwrap();
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total_items, 5);
}

#[tokio::test]
async fn withdrawal_view_joins_players_and_successor() {
    let ctx = TestContext::new().await;
    let (p1, alice, bob) = ctx.active_team("Alice", "Bob").await;
    let r1 = ctx.engine.submit_withdrawal(p1.id, bob, "relocating").await.unwrap();
    ctx.engine.reject_withdrawal(r1.id, Uuid::now_v7(), None).await.unwrap();
    let r2 = ctx.engine.submit_withdrawal(p1.id, bob, "relocating, really").await.unwrap();
    let p2 = ctx.engine.approve_withdrawal(r2.id, Uuid::now_v7(), None).await.unwrap().successor_partnership;

    let approved = ctx.review.withdrawal_detail(r2.id).await.unwrap();
    assert_eq!(approved.requester.id, bob);
    assert_eq!(approved.requester.name.as_deref(), Some("Bob"));
    assert_eq!(approved.partnership.captain.name.as_deref(), Some("Alice"));
    assert_eq!(approved.partnership.partnership.status, PartnershipStatus::Dissolved);
    let successor = approved.successor.expect("approved request shows its successor");
    assert_eq!(successor.partnership.id, p2.id);
    assert_eq!(successor.captain.id, alice);
    assert!(successor.partner.is_none());

    // the rejected request on the same team does not claim the successor
    let rejected = ctx.review.withdrawal_detail(r1.id).await.unwrap();
    assert_eq!(rejected.request.status, WithdrawalStatus::Rejected);
    assert!(rejected.successor.is_none());

    let missing = ctx.review.withdrawal_detail(Uuid::now_v7()).await.unwrap_err();
    assert!(matches!(missing, AppError::NotFound(_)), "got {missing:?}");
}

#[tokio::test]
async fn withdrawals_filter_by_status_context_and_search() {
    let ctx = TestContext::new().await;
    let (p1, _alice, bob) = ctx.active_team("Alice", "Bob").await;
    let (q1, carol, _dave) = ctx.active_team("Carol", "Dave").await;
    let r1 = ctx.engine.submit_withdrawal(p1.id, bob, "Relocating abroad").await.unwrap();
    let r2 = ctx.engine.submit_withdrawal(q1.id, carol, "knee injury").await.unwrap();
    ctx.engine.approve_withdrawal(r2.id, Uuid::now_v7(), None).await.unwrap();

    let pending = ctx
        .review
        .list_withdrawals(&WithdrawalQuery { status: Some(WithdrawalStatus::Pending), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(pending.items.iter().map(|v| v.request.id).collect::<Vec<_>>(), vec![r1.id]);

    // reason text, case-insensitive
    let by_reason = ctx
        .review
        .list_withdrawals(&WithdrawalQuery { search: Some("ABROAD".into()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(by_reason.items.iter().map(|v| v.request.id).collect::<Vec<_>>(), vec![r1.id]);

    // player name on either slot
    let by_player = ctx
        .review
        .list_withdrawals(&WithdrawalQuery { search: Some("dav".into()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(by_player.items.iter().map(|v| v.request.id).collect::<Vec<_>>(), vec![r2.id]);

    // LIKE wildcards are literal
    let wildcard = ctx
        .review
        .list_withdrawals(&WithdrawalQuery { search: Some("%".into()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(wildcard.total_items, 0);

    let other_division = ctx
        .review
        .list_withdrawals(&WithdrawalQuery { division_id: Some(Uuid::now_v7()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(other_division.total_items, 0);

    let this_season = ctx
        .review
        .list_withdrawals(&WithdrawalQuery {
            division_id: Some(ctx.division),
            season_id: Some(ctx.season),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(this_season.total_items, 2);

    let future = ctx
        .review
        .list_withdrawals(&WithdrawalQuery {
            from: Some(chrono::Utc::now() + chrono::Duration::hours(1)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(future.total_items, 0);
}

#[tokio::test]
async fn search_folds_non_ascii_case() {
    let ctx = TestContext::new().await;
    let (p1, _olafur, bjork) = ctx.active_team("ÓLAFUR", "Björk").await;
    let (q1, _erin, frank) = ctx.active_team("Erin", "Frank").await;
    let r1 = ctx.engine.submit_withdrawal(p1.id, bjork, "Leaving for a job").await.unwrap();
    let r2 = ctx.engine.submit_withdrawal(q1.id, frank, "MOVING TO ZÜRICH").await.unwrap();

    let by_player = ctx
        .review
        .list_withdrawals(&WithdrawalQuery { search: Some("óla".into()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(by_player.items.iter().map(|v| v.request.id).collect::<Vec<_>>(), vec![r1.id]);

    let by_reason = ctx
        .review
        .list_withdrawals(&WithdrawalQuery { search: Some("zürich".into()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(by_reason.items.iter().map(|v| v.request.id).collect::<Vec<_>>(), vec![r2.id]);

    // the key follows a rename from the directory
    ctx.db.sync_player(frank, "Émile").await.unwrap();
    let renamed = ctx
        .review
        .list_withdrawals(&WithdrawalQuery { search: Some("ÉMI".into()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(renamed.items.iter().map(|v| v.request.id).collect::<Vec<_>>(), vec![r2.id]);
}

#[tokio::test]
async fn dissolved_list_shows_terminal_partnerships_only() {
    let ctx = TestContext::new().await;
    let admin = Uuid::now_v7();
    let (p1, _alice, bob) = ctx.active_team("Alice", "Bob").await;
    let r1 = ctx.engine.submit_withdrawal(p1.id, bob, "relocating").await.unwrap();
    let p2 = ctx.engine.approve_withdrawal(r1.id, admin, None).await.unwrap().successor_partnership;
    ctx.active_team("Carol", "Dave").await;

    let dissolved = ctx.review.list_dissolved_partnerships(&PartnershipQuery::default()).await.unwrap();
    assert_eq!(dissolved.total_items, 1);
    let view = &dissolved.items[0];
    assert_eq!(view.summary.partnership.id, p1.id);
    assert_eq!(view.withdrawal_request.as_ref().map(|r| r.id), Some(r1.id));
    assert_eq!(view.successor.as_ref().map(|s| s.partnership.id), Some(p2.id));
    assert_eq!(view.summary.partner.as_ref().and_then(|p| p.name.as_deref()), Some("Bob"));

    // season close moves the rest into the EXPIRED bucket
    ctx.engine.close_season(ctx.division, ctx.season, admin).await.unwrap();
    let all = ctx.review.list_dissolved_partnerships(&PartnershipQuery::default()).await.unwrap();
    assert_eq!(all.total_items, 3);
    let expired = ctx
        .review
        .list_dissolved_partnerships(&PartnershipQuery { status: Some(PartnershipStatus::Expired), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(expired.total_items, 2);
    assert!(expired.items.iter().all(|v| v.withdrawal_request.is_none()));

    let by_reason = ctx
        .review
        .list_dissolved_partnerships(&PartnershipQuery { search: Some("relocat".into()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(by_reason.items.iter().map(|v| v.summary.partnership.id).collect::<Vec<_>>(), vec![p1.id]);

    let by_name = ctx
        .review
        .list_dissolved_partnerships(&PartnershipQuery { search: Some("carol".into()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(by_name.total_items, 1);
    assert_eq!(by_name.items[0].summary.partnership.status, PartnershipStatus::Expired);
}

#[tokio::test]
async fn detail_and_query_validation() {
    let ctx = TestContext::new().await;
    let (p1, _alice, _bob) = ctx.active_team("Alice", "Bob").await;

    let detail = ctx.review.partnership_detail(p1.id).await.unwrap();
    assert_eq!(detail.summary.partnership, p1);
    assert!(detail.successor.is_none() && detail.withdrawal_request.is_none());

    let open_status = ctx
        .review
        .list_dissolved_partnerships(&PartnershipQuery { status: Some(PartnershipStatus::Active), ..Default::default() })
        .await
        .unwrap_err();
    assert!(matches!(open_status, AppError::Validation(_)), "got {open_status:?}");

    let page_zero = ctx
        .review
        .list_withdrawals(&WithdrawalQuery { page: Some(0), ..Default::default() })
        .await
        .unwrap_err();
    assert!(matches!(page_zero, AppError::Validation(_)), "got {page_zero:?}");

    let huge_page = ctx
        .review
        .list_withdrawals(&WithdrawalQuery { page_size: Some(1000), ..Default::default() })
        .await
        .unwrap_err();
    assert!(matches!(huge_page, AppError::Validation(_)), "got {huge_page:?}");

    let far_page = ctx
        .review
        .list_withdrawals(&WithdrawalQuery { page: Some(u64::MAX), ..Default::default() })
        .await
        .unwrap_err();
    assert!(matches!(far_page, AppError::Validation(_)), "got {far_page:?}");

    let far_dissolved = ctx
        .review
        .list_dissolved_partnerships(&PartnershipQuery { page: Some(u64::MAX), page_size: Some(100), ..Default::default() })
        .await
        .unwrap_err();
    assert!(matches!(far_dissolved, AppError::Validation(_)), "got {far_dissolved:?}");

    let missing = ctx.review.partnership_detail(Uuid::now_v7()).await.unwrap_err();
    assert!(matches!(missing, AppError::NotFound(_)), "got {missing:?}");
}
