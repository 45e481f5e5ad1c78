//! Game Shell entry point
//!
//! Wires the pure shell logic to the browser: installs the state entry
//! point and unload flush, attaches the mount observer, then hands control
//! to the engine's own init.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_shell {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, MutationObserver, MutationObserverInit, Window};

    use game_shell::bootstrap::{StartupRejection, classify_rejection};
    use game_shell::consts::{LOADING_ELEMENT_ID, STATE_ENTRY_POINT, SURFACE_TAG};
    use game_shell::mount::{MountCheck, MountWatch};
    use game_shell::state::StateBuffer;
    use game_shell::store::{LocalStore, flush};

    // The engine bundle and the audio unlock helper are loaded by the host
    // page before the shell starts; both are reached as window globals.
    #[wasm_bindgen]
    extern "C" {
        /// Opaque engine init. May reject with an Error whose message the
        /// shell classifies; the handle it resolves to is not retained.
        #[wasm_bindgen(catch, js_namespace = window, js_name = initEngine)]
        async fn init_engine() -> Result<JsValue, JsValue>;

        /// Re-arms the page's AudioContext on the first user gesture
        #[wasm_bindgen(js_namespace = window, js_name = restartAudioContext)]
        fn restart_audio_context();
    }

    thread_local! {
        // Single JS thread; callbacks run as whole turns, so a RefCell is
        // all the synchronization the buffer needs.
        static BUFFER: RefCell<StateBuffer> = RefCell::new(StateBuffer::new());
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("failed to init logger");

        log::info!("game shell starting");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        restart_audio_context();

        install_state_entry_point(&window)?;
        install_unload_flush(&window)?;
        watch_for_mount(&document)?;

        // Last, so none of the registrations above wait on the engine.
        boot().await
    }

    /// Invoke engine init once and classify its outcome.
    ///
    /// A benign control-flow rejection is swallowed without a trace. Any
    /// other rejection is returned unchanged and ends up on the browser's
    /// unhandled-rejection channel.
    async fn boot() -> Result<(), JsValue> {
        match init_engine().await {
            Ok(_) => Ok(()),
            Err(err) => {
                let message = err
                    .dyn_ref::<js_sys::Error>()
                    .map(|e| String::from(e.message()))
                    .unwrap_or_default();
                match classify_rejection(&message) {
                    StartupRejection::BenignControlFlow => Ok(()),
                    StartupRejection::Fatal => Err(err),
                }
            }
        }
    }

    /// Publish the write entry point the engine pushes snapshots through.
    ///
    /// The engine binds `window.buffer_game_state` by name, so the closure
    /// is set on `window` directly and leaked for the page's lifetime.
    fn install_state_entry_point(window: &Window) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(String)>::new(|json: String| {
            BUFFER.with(|buffer| {
                if let Err(err) = buffer.borrow_mut().replace_from_json(&json) {
                    log::error!("discarding state snapshot: {err}");
                }
            });
        });
        js_sys::Reflect::set(
            window.as_ref(),
            &JsValue::from_str(STATE_ENTRY_POINT),
            closure.as_ref(),
        )?;
        closure.forget();
        Ok(())
    }

    /// Flush the buffered snapshot into LocalStorage when the page goes away.
    fn install_unload_flush(window: &Window) -> Result<(), JsValue> {
        let Some(storage) = window.local_storage()? else {
            log::warn!("no LocalStorage - state will not survive reloads");
            return Ok(());
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut store = LocalStore::new(storage.clone());
            let written = BUFFER.with(|buffer| flush(buffer.borrow().snapshot(), &mut store));
            log::info!("flushed {written} state pairs");
        });
        window.add_event_listener_with_callback("beforeunload", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Watch for the engine's canvas and dismiss the loading screen once.
    fn watch_for_mount(document: &Document) -> Result<(), JsValue> {
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("no document body"))?;

        let doc = document.clone();
        let mut watch = MountWatch::new();
        let closure = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
            move |_records: js_sys::Array, observer: MutationObserver| {
                let surface_present = doc.query_selector(SURFACE_TAG).ok().flatten().is_some();
                match watch.on_mutation(surface_present) {
                    MountCheck::Mounted => {
                        if let Some(loading) = doc.get_element_by_id(LOADING_ELEMENT_ID) {
                            let _ = loading.set_attribute("class", "hidden");
                        }
                        log::info!("engine mounted, removing loading screen");
                        observer.disconnect();
                    }
                    MountCheck::SurfaceAbsent => {
                        log::warn!("no {SURFACE_TAG} element yet");
                    }
                    MountCheck::Concluded => {}
                }
            },
        );

        let observer = MutationObserver::new(closure.as_ref().unchecked_ref())?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer.observe_with_options(&body, &init)?;
        closure.forget();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_shell::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use game_shell::bootstrap::{StartupRejection, classify_rejection};
    use game_shell::consts::BENIGN_STARTUP_PREFIX;
    use game_shell::state::StateBuffer;

    env_logger::init();
    log::info!("game-shell (native) - the shell only does real work on wasm32");

    // Quick smoke of the pure pieces
    assert_eq!(
        classify_rejection(BENIGN_STARTUP_PREFIX),
        StartupRejection::BenignControlFlow
    );
    let mut buffer = StateBuffer::new();
    buffer
        .replace_from_json(r#"{"smoke":"ok"}"#)
        .expect("smoke snapshot should parse");
    println!("✓ shell smoke checks passed");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
