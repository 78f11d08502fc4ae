pub mod client_logo;
pub mod profile;
pub mod project;
pub mod site_setting;
pub mod software_logo;
pub mod testimonial;
pub mod user;
