use wasm_bindgen::prelude::*;
use keep_engine::*;

mod content;
mod dialogue;
mod game;
mod modal;
mod panels;
mod signals;
mod tour;

use game::TowerCv;

keep_web::export_game!(TowerCv, "tower-cv");
