pub mod payment;
pub mod place_holder;
pub mod response;
pub mod template;
pub mod validation;
