//! Tiled-compatible wang set data model
//!
//! A wang set groups tiles of a tileset under a named autotile theme. Each
//! member tile carries an 8-slot signature (its [`WangId`]) saying which
//! terrain color sits on each edge and corner. This crate models those
//! tables as they appear in `.tsx` files; it does not select tiles.
//!
//! # Example
//!
//! ```rust
//! use tsxkit_wang::{Color, WangColor, WangId, WangSet, WangSetType};
//!
//! let mut set = WangSet::new("Wall/Cliff grassy".to_string(), WangSetType::Mixed);
//! set.add_color(WangColor::new("AUTOTILE".to_string(), Color::RED));
//! set.set_tile(22, "1,1,1,1,1,1,1,1".parse::<WangId>().unwrap());
//! set.set_tile(0, "0,0,1,1,1,0,0,0".parse::<WangId>().unwrap());
//!
//! assert_eq!(set.find_uniform_tiles(0), vec![22]);
//! ```

pub mod color;
pub mod set;
pub mod wang;

// Re-export main types at crate root
pub use color::{Color, ParseColorError};
pub use set::{ParseWangSetTypeError, WangColor, WangSet, WangSetType, WangTile};
pub use wang::{ParseWangIdError, WangId, WangPosition};
