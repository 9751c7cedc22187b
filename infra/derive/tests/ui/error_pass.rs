use geopost_derive::geopost_error;
use std::borrow::Cow;

#[geopost_error]
pub enum StoreError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Not found{}: {id}", format_context(.context))]
    NotFound { id: i64, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<(), StoreError> {
    Err(std::io::Error::other("disk")).context("Reading store")
}

fn main() {
    let err = read().unwrap_err();
    assert_eq!(err.to_string(), "IO error (Reading store): disk");

    let err: StoreError = "broken".into();
    assert!(matches!(err, StoreError::Internal { .. }));

    let err = Err::<(), _>(StoreError::NotFound { id: 7, context: None })
        .context("Loading address")
        .unwrap_err();
    assert_eq!(err.to_string(), "Not found (Loading address): 7");
}
