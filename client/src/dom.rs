//! Browser bindings: `web-sys` implementations of the markup-host traits and
//! the wasm entry point.
//!
//! TRADE-OFFS
//! ==========
//! The submit closure is leaked with `Closure::forget`; the widget lives as
//! long as the page, so there is nothing to tear down.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, HtmlElement, HtmlFormElement, HtmlInputElement};

use crate::config::WidgetConfig;
use crate::net::transport::GlooTransport;
use crate::widget::ChatWidget;
use crate::widget::host::{LoadingIndicator, MESSAGE_CLASS, MessageInput, MessageList, Role};

// =============================================================================
// ELEMENT HANDLES
// =============================================================================

pub struct DomInput(HtmlInputElement);

impl MessageInput for DomInput {
    fn value(&self) -> String {
        self.0.value()
    }

    fn clear(&self) {
        self.0.set_value("");
    }
}

pub struct DomMessageList {
    document: Document,
    container: HtmlElement,
}

impl MessageList for DomMessageList {
    fn append(&self, text: &str, role: Role) {
        let Ok(el) = self.document.create_element("div") else {
            log::error!("failed to create message element");
            return;
        };
        let _ = el.class_list().add_2(MESSAGE_CLASS, role.class_name());
        if let Some(el) = el.dyn_ref::<HtmlElement>() {
            el.set_inner_text(text);
        } else {
            el.set_text_content(Some(text));
        }
        let _ = self.container.append_child(&el);
        self.scroll_to_bottom();
    }

    fn scroll_to_bottom(&self) {
        self.container.set_scroll_top(self.container.scroll_height());
    }
}

pub struct DomIndicator {
    el: HtmlElement,
    hidden_class: String,
}

impl LoadingIndicator for DomIndicator {
    fn show(&self) {
        let _ = self.el.class_list().remove_1(&self.hidden_class);
    }

    fn hide(&self) {
        let _ = self.el.class_list().add_1(&self.hidden_class);
    }
}

// =============================================================================
// MOUNT
// =============================================================================

/// Wasm entry point: install logging, then mount once the markup is ready.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);

    let document = document()?;
    if document.ready_state() == "loading" {
        let on_ready = Closure::<dyn FnMut()>::new(|| {
            if let Err(e) = mount(&WidgetConfig::default()) {
                log::error!("chat widget mount failed: {e:?}");
            }
        });
        document.add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())?;
        on_ready.forget();
        Ok(())
    } else {
        mount(&WidgetConfig::default())
    }
}

/// Resolve the host elements and bind the submit handler.
///
/// # Errors
///
/// Returns an error if there is no document or any configured element is
/// missing or of the wrong type.
pub fn mount(config: &WidgetConfig) -> Result<(), JsValue> {
    let document = document()?;
    let form: HtmlFormElement = element_by_id(&document, &config.form_id)?;
    let input: HtmlInputElement = element_by_id(&document, &config.input_id)?;
    let container: HtmlElement = element_by_id(&document, &config.container_id)?;
    let indicator: HtmlElement = element_by_id(&document, &config.indicator_id)?;

    let widget = Rc::new(ChatWidget::new(
        DomInput(input),
        DomMessageList { document, container },
        DomIndicator { el: indicator, hidden_class: config.hidden_class.clone() },
        GlooTransport,
        config.endpoint.clone(),
    ));

    let on_submit = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        event.prevent_default();
        let Some(text) = widget.accept_input() else {
            return;
        };
        let widget = Rc::clone(&widget);
        wasm_bindgen_futures::spawn_local(async move {
            widget.deliver(&text).await;
        });
    });
    form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
    on_submit.forget();

    log::info!("chat widget mounted on #{}", config.form_id);
    Ok(())
}

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn element_by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("element #{id} has unexpected type")))
}
