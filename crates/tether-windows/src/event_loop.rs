use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::OnceLock;

use tether_core::{Notification, WindowId, WindowResult};
use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::Accessibility::{HWINEVENTHOOK, SetWinEventHook, UnhookWinEvent};
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GA_ROOT, GetAncestor, GetMessageW, MSG, PostThreadMessageW,
    TranslateMessage, WINEVENT_OUTOFCONTEXT, WINEVENT_SKIPOWNPROCESS, WM_APP, WM_QUIT,
};

use crate::event::{EVENT_OBJECT_LOCATIONCHANGE, EVENT_SYSTEM_FOREGROUND, RawEvent, Translator};
use crate::{Subscriptions, Window};

/// Minimum event code we listen for (EVENT_SYSTEM_FOREGROUND = 0x0003).
const EVENT_MIN: u32 = EVENT_SYSTEM_FOREGROUND;

/// Maximum event code we listen for (EVENT_OBJECT_LOCATIONCHANGE = 0x800B).
const EVENT_MAX: u32 = EVENT_OBJECT_LOCATIONCHANGE;

/// Posted to wake the pump when the hook queued events.
const WM_TETHER_EVENTS: u32 = WM_APP + 1;

/// Thread running the pump, for [`quit`].
static PUMP_THREAD: OnceLock<u32> = OnceLock::new();

// Events captured by the hook, drained by the pump after each message.
thread_local! {
    static QUEUE: RefCell<VecDeque<RawEvent>> = const { RefCell::new(VecDeque::new()) };
}

/// Runs the Win32 message pump on the calling thread until [`quit`].
///
/// WinEvents are translated into [`Notification`]s and handed to `handler`
/// one at a time, only for windows and listener kinds present in
/// `subscriptions`. The handler runs outside the hook callback, so it may
/// move, show or hide windows freely; whatever those calls trigger is
/// queued and delivered after it returns.
///
/// Overlay windows must be created on this thread so their paint
/// messages are dispatched here.
pub fn run(
    subscriptions: &Subscriptions,
    mut handler: impl FnMut(&Notification),
) -> WindowResult<()> {
    let thread_id = unsafe { GetCurrentThreadId() };
    if PUMP_THREAD.set(thread_id).is_err() {
        return Err("event loop already started".into());
    }

    // SAFETY: SetWinEventHook registers our callback for system-wide
    // window events. WINEVENT_OUTOFCONTEXT means the callback runs in
    // our process. WINEVENT_SKIPOWNPROCESS ignores our own windows.
    let hook = unsafe {
        SetWinEventHook(
            EVENT_MIN,
            EVENT_MAX,
            None,
            Some(win_event_proc),
            0,
            0,
            WINEVENT_OUTOFCONTEXT | WINEVENT_SKIPOWNPROCESS,
        )
    };
    if hook.is_invalid() {
        return Err("failed to set WinEvent hook".into());
    }

    let foreground = Window::foreground().and_then(|w| w.root()).map(|w| w.id());
    let mut translator = Translator::new(foreground);
    tracing::debug!(thread_id, ?foreground, "event loop started");

    let mut msg = MSG::default();
    loop {
        // 0 means WM_QUIT, -1 an invalid call.
        let status = unsafe { GetMessageW(&mut msg, None, 0, 0) };
        if status.0 == 0 || status.0 == -1 {
            break;
        }

        if msg.message != WM_TETHER_EVENTS {
            unsafe {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }

        drain(&mut translator, subscriptions, &mut handler);
    }

    unsafe {
        let _ = UnhookWinEvent(hook);
    }
    tracing::debug!("event loop stopped");
    Ok(())
}

/// Asks the running event loop to return. Safe to call from any thread.
pub fn quit() {
    if let Some(&thread_id) = PUMP_THREAD.get() {
        unsafe {
            let _ = PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
        }
    }
}

fn drain(
    translator: &mut Translator,
    subscriptions: &Subscriptions,
    handler: &mut impl FnMut(&Notification),
) {
    // Pop one at a time: the handler may cause more events to be queued.
    while let Some(raw) = QUEUE.with(|q| q.borrow_mut().pop_front()) {
        // Foreground changes are always translated so the translator knows
        // which window to report as deactivated later.
        if !raw.is_foreground() && !subscriptions.watches(raw.root) {
            continue;
        }

        let rect = || Window::from_raw(raw.hwnd.0).rect().ok();
        for notification in translator.translate(raw, rect) {
            if subscriptions.accepts(&notification) {
                tracing::trace!(%notification, "dispatch");
                handler(&notification);
            }
        }
    }
}

/// The WinEvent callback.
unsafe extern "system" fn win_event_proc(
    _hook: HWINEVENTHOOK,
    event: u32,
    hwnd: HWND,
    id_object: i32,
    _id_child: i32,
    _event_thread: u32,
    _event_time: u32,
) {
    if hwnd.is_invalid() {
        return;
    }

    // SAFETY: GetAncestor returns a null HWND for windows already gone.
    let root = unsafe { GetAncestor(hwnd, GA_ROOT) };
    let root = if root.is_invalid() { hwnd } else { root };
    let raw = RawEvent {
        event,
        hwnd: WindowId(hwnd.0 as usize),
        root: WindowId(root.0 as usize),
        id_object,
    };

    let was_empty = QUEUE.with(|q| {
        let mut q = q.borrow_mut();
        let was_empty = q.is_empty();
        q.push_back(raw);
        was_empty
    });

    // Make sure GetMessageW returns so the queue gets drained.
    if was_empty && let Some(&thread_id) = PUMP_THREAD.get() {
        unsafe {
            let _ = PostThreadMessageW(thread_id, WM_TETHER_EVENTS, WPARAM(0), LPARAM(0));
        }
    }
}
