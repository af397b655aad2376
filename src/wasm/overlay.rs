use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, HtmlElement};

use crate::timing::FrameStats;

/// Frames between text refreshes.
const REFRESH_EVERY: u32 = 10;

/// Running frame-timing overlay. Stops when dropped.
pub struct Overlay {
    running: Rc<Cell<bool>>,
    stats: Rc<RefCell<FrameStats>>,
    element: HtmlElement,
}

impl Overlay {
    pub fn summary(&self) -> String {
        self.stats.borrow().summary()
    }
}

impl Drop for Overlay {
    fn drop(&mut self) {
        self.running.set(false);
        let _ = self.element.style().set_property("display", "none");
    }
}

/// Start sampling frame times and writing them into `element`.
pub fn attach(element: HtmlElement) -> Result<Overlay, JsValue> {
    let performance = window()
        .ok_or("no window")?
        .performance()
        .ok_or("performance timer unavailable")?;
    element.style().set_property("display", "block")?;

    let running = Rc::new(Cell::new(true));
    let stats = Rc::new(RefCell::new(FrameStats::default()));

    // `f` holds the animation-frame closure so it can reschedule itself.
    // The first frame after `running` goes false takes the closure back out
    // of `f`, breaking the cycle; wasm-bindgen frees it once the call returns.
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let (loop_running, loop_stats, target) = (running.clone(), stats.clone(), element.clone());
    let mut frame: u32 = 0;
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !loop_running.get() {
            drop(f.borrow_mut().take());
            return;
        }
        loop_stats.borrow_mut().tick(performance.now());
        frame = frame.wrapping_add(1);
        if frame % REFRESH_EVERY == 0 {
            target.set_inner_text(&loop_stats.borrow().summary());
        }

        // schedule next
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));

    if let Some(cb) = g.borrow().as_ref() {
        window()
            .ok_or("no window")?
            .request_animation_frame(cb.as_ref().unchecked_ref())?;
    }

    Ok(Overlay {
        running,
        stats,
        element,
    })
}
