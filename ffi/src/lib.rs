//! C-ABI wrapper around `userlist-core`.
//!
//! # Overview
//! Lets a native mobile shell drive the user list screen: it forwards user
//! intents, executes the HTTP requests the screen hands out, reports their
//! outcome by ticket, and renders the JSON state snapshot and alerts.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Intent and completion calls return `FfiStatus`; pointer-returning calls
//!   return null when there is nothing to hand out or an argument is null.
//! - The C caller owns all returned pointers and must call the matching
//!   `userlist_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use userlist_core::{FetchFailure, HttpResponse, UserClient, UserId, UserListScreen};

use types::*;

/// Read a C string argument. Invalid UTF-8 yields `None`.
fn read_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// Run `f` against the screen behind `screen`, mapping null and panics to
/// status codes.
fn with_screen<F>(screen: *mut FfiUserListScreen, f: F) -> FfiStatus
where
    F: FnOnce(&mut UserListScreen) -> FfiStatus,
{
    if screen.is_null() {
        return FfiStatus::NullArg;
    }
    catch_unwind(AssertUnwindSafe(|| {
        let screen = unsafe { &mut *screen };
        f(&mut screen.inner)
    }))
    .unwrap_or(FfiStatus::Panic)
}

// ---------------------------------------------------------------------------
// Screen lifecycle
// ---------------------------------------------------------------------------

/// Create a screen bound to `collection_url`, or to the hosted collection
/// when `collection_url` is null.
///
/// Returns null if `collection_url` is not valid UTF-8 or on internal panic.
/// The caller must free the returned pointer with `userlist_screen_free`.
#[unsafe(no_mangle)]
pub extern "C" fn userlist_screen_new(collection_url: *const c_char) -> *mut FfiUserListScreen {
    catch_unwind(|| {
        let client = if collection_url.is_null() {
            UserClient::default()
        } else {
            match read_str(collection_url) {
                Some(url) => UserClient::new(url),
                None => return std::ptr::null_mut(),
            }
        };
        let screen = FfiUserListScreen {
            inner: UserListScreen::new(client),
        };
        Box::into_raw(Box::new(screen))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a screen created by `userlist_screen_new`. Safe to call with null.
/// In-flight requests are simply forgotten.
#[unsafe(no_mangle)]
pub extern "C" fn userlist_screen_free(screen: *mut FfiUserListScreen) {
    if !screen.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(screen) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Intents
// ---------------------------------------------------------------------------

/// Start the initial load. Call once when the screen appears.
#[unsafe(no_mangle)]
pub extern "C" fn userlist_screen_mount(screen: *mut FfiUserListScreen) -> FfiStatus {
    with_screen(screen, |s| {
        s.mount();
        FfiStatus::Ok
    })
}

/// Pull-to-refresh.
#[unsafe(no_mangle)]
pub extern "C" fn userlist_screen_refresh(screen: *mut FfiUserListScreen) -> FfiStatus {
    with_screen(screen, |s| {
        s.refresh();
        FfiStatus::Ok
    })
}

/// Delete the user with `id`. Returns `InvalidArg` for an empty or
/// malformed id.
#[unsafe(no_mangle)]
pub extern "C" fn userlist_screen_delete(screen: *mut FfiUserListScreen, id: *const c_char) -> FfiStatus {
    if id.is_null() {
        return FfiStatus::NullArg;
    }
    with_screen(screen, |s| {
        match read_str(id).and_then(|raw| UserId::parse(raw).ok()) {
            Some(id) => {
                s.delete(id);
                FfiStatus::Ok
            }
            None => FfiStatus::InvalidArg,
        }
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn userlist_screen_open_modal(screen: *mut FfiUserListScreen) -> FfiStatus {
    with_screen(screen, |s| {
        s.open_modal();
        FfiStatus::Ok
    })
}

/// Close the creation form and discard the draft.
#[unsafe(no_mangle)]
pub extern "C" fn userlist_screen_cancel_modal(screen: *mut FfiUserListScreen) -> FfiStatus {
    with_screen(screen, |s| {
        s.cancel_modal();
        FfiStatus::Ok
    })
}

/// Replace one draft field. `field` is one of the `USERLIST_FIELD_*`
/// constants; a null `value` clears the field.
#[unsafe(no_mangle)]
pub extern "C" fn userlist_screen_set_draft_field(
    screen: *mut FfiUserListScreen,
    field: u32,
    value: *const c_char,
) -> FfiStatus {
    with_screen(screen, |s| {
        let Some(field) = draft_field(field) else {
            return FfiStatus::InvalidArg;
        };
        let value = if value.is_null() {
            ""
        } else {
            match read_str(value) {
                Some(v) => v,
                None => return FfiStatus::InvalidArg,
            }
        };
        s.edit_draft(field, value);
        FfiStatus::Ok
    })
}

/// Submit the creation form. Validation failures surface as an alert.
#[unsafe(no_mangle)]
pub extern "C" fn userlist_screen_submit(screen: *mut FfiUserListScreen) -> FfiStatus {
    with_screen(screen, |s| {
        s.submit();
        FfiStatus::Ok
    })
}

// ---------------------------------------------------------------------------
// Host I/O
// ---------------------------------------------------------------------------

/// Take the next request to execute, or null when none is queued.
/// The caller must free the returned pointer with `userlist_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn userlist_screen_next_request(screen: *mut FfiUserListScreen) -> *mut FfiHttpRequest {
    if screen.is_null() {
        return std::ptr::null_mut();
    }
    catch_unwind(AssertUnwindSafe(|| {
        let screen = unsafe { &mut *screen };
        match screen.inner.poll_request() {
            Some(pending) => FfiHttpRequest::from_core(pending),
            None => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Report the HTTP response for `ticket`. Error statuses are reported here
/// too; the screen classifies them.
#[unsafe(no_mangle)]
pub extern "C" fn userlist_screen_complete(
    screen: *mut FfiUserListScreen,
    ticket: u64,
    response: *const FfiHttpResponse,
) -> FfiStatus {
    if response.is_null() {
        return FfiStatus::NullArg;
    }
    with_screen(screen, |s| {
        let resp = unsafe { &*response };
        let body = read_str(resp.body).unwrap_or("");
        completion_status(s.complete(ticket, Ok(HttpResponse::new(resp.status, body))))
    })
}

/// Report that `ticket` could not be executed at all (no connection, DNS,
/// timeout). `message` may be null.
#[unsafe(no_mangle)]
pub extern "C" fn userlist_screen_fail(
    screen: *mut FfiUserListScreen,
    ticket: u64,
    message: *const c_char,
) -> FfiStatus {
    with_screen(screen, |s| {
        let message = read_str(message).unwrap_or("transport failure").to_string();
        completion_status(s.complete(ticket, Err(FetchFailure::Transport(message))))
    })
}

fn completion_status(result: Result<(), userlist_core::ScreenError>) -> FfiStatus {
    match result {
        Ok(()) => FfiStatus::Ok,
        Err(_) => FfiStatus::UnknownTicket,
    }
}

/// Take the next alert to show, or null when none is pending.
/// The caller must free the returned pointer with `userlist_free_alert`.
#[unsafe(no_mangle)]
pub extern "C" fn userlist_screen_next_alert(screen: *mut FfiUserListScreen) -> *mut FfiAlert {
    if screen.is_null() {
        return std::ptr::null_mut();
    }
    catch_unwind(AssertUnwindSafe(|| {
        let screen = unsafe { &mut *screen };
        match screen.inner.take_alert() {
            Some(alert) => FfiAlert::from_core(alert),
            None => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Current state as JSON: `users`, `loading`, `refreshing`, `submitting`,
/// `modalOpen`, `draft`. Free with `userlist_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn userlist_screen_snapshot_json(screen: *const FfiUserListScreen) -> *mut c_char {
    if screen.is_null() {
        return std::ptr::null_mut();
    }
    catch_unwind(AssertUnwindSafe(|| {
        let screen = unsafe { &*screen };
        match serde_json::to_string(&screen.inner.state().snapshot()) {
            Ok(json) => c_string(json),
            Err(_) => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by `userlist_screen_next_request`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn userlist_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.path);
        free_c_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(req.headers, req.headers_len as usize))
            };
            for h in headers.iter() {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    }));
}

/// Free an `FfiAlert` returned by `userlist_screen_next_alert`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn userlist_free_alert(alert: *mut FfiAlert) {
    if alert.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let alert = unsafe { Box::from_raw(alert) };
        free_c_string(alert.title);
        free_c_string(alert.message);
    }));
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn userlist_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| free_c_string(s)));
    }
}

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
