pub mod dialogs;
pub mod links;
pub mod password;
pub mod text_view;
