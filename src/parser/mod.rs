mod common;
mod go;

pub use common::{children, find_descendant, node_text};
pub use go::{declared_name, receiver_type_name, GoParser};
