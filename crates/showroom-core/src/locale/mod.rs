pub mod bundle;
pub mod money;

pub use bundle::{Locale, ResourceBundle, TextDirection};
pub use money::format_money;
