pub mod player;
pub mod partnership;
pub mod withdrawal_request;

/*
 A partnership is a doubles team registered in one division/season.
 When a player leaves, an admin approves their withdrawal request; the team is
 dissolved and the remaining player gets a successor partnership (FORMING) that
 points back at it through predecessor_id. Rows are never deleted, so the
 predecessor chain doubles as the team's history.
 */
