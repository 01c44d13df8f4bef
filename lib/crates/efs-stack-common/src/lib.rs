pub mod cidr;
pub mod intrinsic;
pub mod template;
pub mod types;

pub use cidr::{CidrError, Ipv4Cidr};
pub use template::{Output, Parameter, Resource, Template, TemplateError};
pub use types::*;
