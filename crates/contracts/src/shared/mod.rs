pub mod validator;
pub mod variant;
