pub mod edit_session;
