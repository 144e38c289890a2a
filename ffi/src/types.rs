//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Conversion helpers live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use userlist_core::{Alert, AlertKind, DraftField, HttpMethod, PendingRequest, UserListScreen};

/// Opaque handle to a `UserListScreen`. C callers receive a pointer to this
/// and pass it back into every `userlist_screen_*` function.
pub struct FfiUserListScreen {
    pub(crate) inner: UserListScreen,
}

/// Field ids accepted by `userlist_screen_set_draft_field`.
pub const USERLIST_FIELD_NOME: u32 = 0;
pub const USERLIST_FIELD_COGNOME: u32 = 1;
pub const USERLIST_FIELD_DATA_NASCITA: u32 = 2;
pub const USERLIST_FIELD_AVATAR: u32 = 3;

/// Map a C field id to a `DraftField`; `None` for unknown ids.
pub(crate) fn draft_field(raw: u32) -> Option<DraftField> {
    match raw {
        USERLIST_FIELD_NOME => Some(DraftField::Nome),
        USERLIST_FIELD_COGNOME => Some(DraftField::Cognome),
        USERLIST_FIELD_DATA_NASCITA => Some(DraftField::DataNascita),
        USERLIST_FIELD_AVATAR => Some(DraftField::Avatar),
        _ => None,
    }
}

/// Copy a Rust string into a heap C string owned by the caller. Interior
/// NUL bytes are dropped rather than failing the whole call.
pub(crate) fn c_string(s: impl Into<String>) -> *mut c_char {
    let mut s = s.into();
    s.retain(|c| c != '\0');
    CString::new(s).unwrap_or_default().into_raw()
}

/// Outcome of every `userlist_screen_*` call that does not return a pointer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiStatus {
    Ok = 0,
    NullArg = 1,
    InvalidArg = 2,
    UnknownTicket = 3,
    Panic = 4,
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Delete = 2,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A request the host must execute, then report back with
/// `userlist_screen_complete` (or `userlist_screen_fail`) using `ticket`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub ticket: u64,
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a queued request into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(pending: PendingRequest) -> *mut Self {
        let req = pending.request;
        let path = c_string(req.path);
        let body = match req.body {
            Some(b) => c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            ticket: pending.ticket,
            method: req.method.into(),
            path,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The caller builds this on the stack after executing a request. The FFI
/// layer reads but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiAlertKind {
    Validation = 0,
    CreateFailed = 1,
    DeleteFailed = 2,
}

impl From<AlertKind> for FfiAlertKind {
    fn from(kind: AlertKind) -> Self {
        match kind {
            AlertKind::Validation => FfiAlertKind::Validation,
            AlertKind::CreateFailed => FfiAlertKind::CreateFailed,
            AlertKind::DeleteFailed => FfiAlertKind::DeleteFailed,
        }
    }
}

/// A blocking notification to show the user. Free with `userlist_free_alert`.
#[repr(C)]
pub struct FfiAlert {
    pub kind: FfiAlertKind,
    pub title: *mut c_char,
    pub message: *mut c_char,
}

impl FfiAlert {
    pub(crate) fn from_core(alert: Alert) -> *mut Self {
        Box::into_raw(Box::new(FfiAlert {
            kind: alert.kind.into(),
            title: c_string(alert.title),
            message: c_string(alert.message),
        }))
    }
}
