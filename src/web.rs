//! Browser host.
//!
//! [`WebDocument`] implements [`Document`] over `web-sys`. The exported
//! `start` function is the load-time entry point: it bootstraps a
//! controller against the live page and drives its virtual clock with
//! `setTimeout`. Click listeners forward their [`ModalIntent`] payload to
//! the same controller.

use crate::config::cfg;
use crate::dom::{Document, DomError, Namespace, SinkStatus};
use crate::lifecycle::{LifecycleController, ModalIntent};
use crate::scroll::ScrollState;
use js_sys::{Array, JSON, Reflect};
use serde_json::Value;
use std::cell::RefCell;
use std::time::Duration;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, Window};

const DATA_LAYER: &str = "dataLayer";

#[inline]
fn host(err: JsValue) -> DomError {
    DomError::Host(format!("{err:?}"))
}

// ============================================================================
// Document
// ============================================================================

/// The live page.
pub struct WebDocument {
    window: Window,
    document: web_sys::Document,
}

impl WebDocument {
    /// The current window's document, if there is one.
    pub fn from_window() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    fn style_target(node: &Element) -> Result<&HtmlElement, DomError> {
        node.dyn_ref::<HtmlElement>()
            .ok_or_else(|| DomError::Host("inline style on a non-HTML element".into()))
    }
}

impl Document<ModalIntent> for WebDocument {
    type Node = Element;

    fn create_element(&mut self, ns: Namespace, tag: &str) -> Result<Element, DomError> {
        self.document
            .create_element_ns(Some(ns.uri()), tag)
            .map_err(host)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) -> Result<(), DomError> {
        node.set_attribute(name, value).map_err(host)
    }

    fn add_class(&mut self, node: &Element, class: &str) -> Result<(), DomError> {
        node.class_list().add_1(class).map_err(host)
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn replace_class(&mut self, node: &Element, from: &str, to: &str) -> bool {
        node.class_list().replace(from, to).unwrap_or(false)
    }

    fn set_text(&mut self, node: &Element, text: &str) -> Result<(), DomError> {
        node.set_text_content(Some(text));
        Ok(())
    }

    fn add_listener(
        &mut self,
        node: &Element,
        event: &str,
        payload: ModalIntent,
    ) -> Result<(), DomError> {
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
            on_intent(payload);
        });
        node.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(host)?;
        // Lives as long as the element does
        callback.forget();
        Ok(())
    }

    fn append_child(&mut self, parent: &Element, child: &Element) -> Result<(), DomError> {
        parent.append_child(child).map(drop).map_err(host)
    }

    fn prepend_child(&mut self, parent: &Element, child: &Element) -> Result<(), DomError> {
        parent
            .insert_before(child, parent.first_child().as_ref())
            .map(drop)
            .map_err(host)
    }

    fn remove_child(&mut self, parent: &Element, child: &Element) -> Result<(), DomError> {
        parent
            .remove_child(child)
            .map(drop)
            .map_err(|_| DomError::NotAChild)
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn is_connected(&self, node: &Element) -> bool {
        node.is_connected()
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn elements_by_class(&self, root: &Element, class: &str) -> Vec<Element> {
        let mut found = Vec::new();
        if root.class_list().contains(class) {
            found.push(root.clone());
        }
        if let Ok(list) = root.query_selector_all(&format!(".{class}")) {
            found.extend(
                (0..list.length())
                    .filter_map(|i| list.get(i))
                    .filter_map(|node| node.dyn_into::<Element>().ok()),
            );
        }
        found
    }

    fn head(&self) -> Option<Element> {
        self.document.head().map(Element::from)
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn location(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn scroll_offset(&self) -> ScrollState {
        ScrollState::new(
            self.window.scroll_y().unwrap_or(0.0),
            self.window.scroll_x().unwrap_or(0.0),
        )
    }

    fn scroll_to(&mut self, offset: ScrollState) {
        self.window.scroll_to_with_x_and_y(offset.left, offset.top);
    }

    fn set_style(&mut self, node: &Element, property: &str, value: &str) -> Result<(), DomError> {
        Self::style_target(node)?
            .style()
            .set_property(property, value)
            .map_err(host)
    }

    fn remove_style(&mut self, node: &Element, property: &str) -> Result<(), DomError> {
        Self::style_target(node)?
            .style()
            .remove_property(property)
            .map(drop)
            .map_err(host)
    }

    fn has_window(&self) -> bool {
        true
    }

    fn push_data_layer(&mut self, entry: &Value) -> Result<SinkStatus, DomError> {
        let key = JsValue::from_str(DATA_LAYER);
        let mut slot = Reflect::get(&self.window, &key).map_err(host)?;
        if slot.is_undefined() || slot.is_null() {
            slot = Array::new().into();
            Reflect::set(&self.window, &key, &slot).map_err(host)?;
        }
        if !Array::is_array(&slot) {
            return Ok(SinkStatus::Foreign);
        }
        let entry = JSON::parse(&entry.to_string()).map_err(host)?;
        slot.unchecked_into::<Array>().push(&entry);
        Ok(SinkStatus::Pushed)
    }
}

// ============================================================================
// Runtime
// ============================================================================

struct Runtime {
    doc: WebDocument,
    controller: LifecycleController<Element>,
    origin: f64,
}

thread_local! {
    static RUNTIME: RefCell<Option<Runtime>> = const { RefCell::new(None) };
}

impl Runtime {
    /// Wall-clock time since `start`, on the controller's clock.
    fn elapsed(&self) -> Duration {
        Duration::from_millis((js_sys::Date::now() - self.origin).max(0.0) as u64)
    }

    /// Set a timeout for the controller's next due task.
    fn arm_timer(&self) {
        let Some(due) = self.controller.next_due() else {
            return;
        };
        let delay = due.saturating_sub(self.elapsed());
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let callback = Closure::<dyn FnMut()>::once(tick);
        if let Err(e) = self
            .doc
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                millis,
            )
        {
            crate::error!("web"; "setTimeout failed: {:?}", e);
            return;
        }
        callback.forget();
    }
}

fn with_runtime<R>(f: impl FnOnce(&mut Runtime) -> R) -> Option<R> {
    RUNTIME.with(|cell| {
        let mut guard = cell.try_borrow_mut().ok()?;
        guard.as_mut().map(f)
    })
}

fn tick() {
    with_runtime(|rt| {
        let now = rt.elapsed();
        rt.controller.run_until(&mut rt.doc, now);
        rt.arm_timer();
    });
}

fn on_intent(intent: ModalIntent) {
    with_runtime(|rt| {
        let now = rt.elapsed();
        if rt.controller.handle_at(&mut rt.doc, intent, now) {
            rt.arm_timer();
        }
    });
}

/// Load-time entry point.
#[wasm_bindgen(start)]
pub fn start() {
    let Some(mut doc) = WebDocument::from_window() else {
        return;
    };
    let mut controller = LifecycleController::new(cfg());
    let scheduled = controller.bootstrap(&mut doc);

    let runtime = Runtime {
        doc,
        controller,
        origin: js_sys::Date::now(),
    };
    if scheduled {
        runtime.arm_timer();
    }
    RUNTIME.with(|cell| *cell.borrow_mut() = Some(runtime));
}
