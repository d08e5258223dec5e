pub mod form;
pub mod register_form;
pub mod reset_form;
