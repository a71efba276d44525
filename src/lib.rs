#![allow(dead_code)]

use wasm_bindgen::prelude::*;

mod bindings;
mod channels;
pub mod dispatcher;
mod errors;
mod gate;
mod playback;
mod prefetch;
mod scroll;
mod sections;
mod utils;

pub use utils::logger::Logger;
