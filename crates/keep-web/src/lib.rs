pub mod runner;

pub use runner::GameRunner;
pub use js_sys;

/// Expands to the `#[wasm_bindgen]` surface the host page calls: lifecycle
/// (`game_init`, `game_tick`), input forwarding, content loading, the UI
/// snapshot and the shared-buffer pointers.
///
/// The game type needs a `new()` constructor. The caller's module must have
/// `wasm_bindgen::prelude::*` and `keep_engine::*` in scope.
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use keep_engine::*;
///
/// keep_web::export_game!(TowerCv, "tower-cv");
/// ```
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> R {
            RUNNER.with(|cell| {
                // Calls before game_init get an idle runner whose ticks do nothing.
                let mut borrow = cell.borrow_mut();
                let runner = borrow.get_or_insert_with(|| $crate::GameRunner::new(<$game_type>::new()));
                f(runner)
            })
        }

        #[wasm_bindgen]
        pub fn game_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some($crate::GameRunner::new(<$game_type>::new()));
            });
            with_runner(|r| r.init());
            log::info!("{}: initialized", $game_name);
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_key_down(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
        }

        #[wasm_bindgen]
        pub fn game_load_manifest(json: &str) {
            with_runner(|r| r.load_manifest(json));
        }

        #[wasm_bindgen]
        pub fn game_load_content(json: &str) {
            with_runner(|r| r.load_content(json));
        }

        /// UI snapshot as a JS object, or `null` when the game exposes none.
        #[wasm_bindgen]
        pub fn game_ui_state() -> JsValue {
            with_runner(|r| r.ui_state())
                .and_then(|json| $crate::js_sys::JSON::parse(&json).ok())
                .unwrap_or(JsValue::NULL)
        }

        $crate::runner_getters! {
            get_header_ptr => header_ptr: *const f32,
            get_instances_ptr => instances_ptr: *const f32,
            get_instance_count => instance_count: u32,
            get_game_events_ptr => game_events_ptr: *const f32,
            get_game_events_len => game_events_len: u32,
            get_world_width => world_width: f32,
            get_world_height => world_height: f32,
            get_max_instances => max_instances: u32,
            get_max_events => max_events: u32,
            get_buffer_total_floats => buffer_total_floats: u32,
        }
    };
}

/// One `#[wasm_bindgen]` export per `export => runner_method: Type` entry.
/// Used by `export_game!`; expects `with_runner` in scope.
#[doc(hidden)]
#[macro_export]
macro_rules! runner_getters {
    ($($export:ident => $method:ident: $ret:ty),* $(,)?) => {
        $(
            #[wasm_bindgen]
            pub fn $export() -> $ret {
                with_runner(|r| r.$method())
            }
        )*
    };
}
