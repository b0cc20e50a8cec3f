use snafu::Snafu;

/// The public Error type for this library.
#[derive(Debug, Snafu)]
pub struct Error(LibError);

/// The public Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// The internal Result type for this library.
pub(crate) type LibResult<T> = std::result::Result<T, LibError>;

/// The internal Error type for this library.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)), context(suffix(false)))]
pub(crate) enum LibError {
    #[snafu(display(
        "{}: the output buffer is too small: {} bytes required, {} available",
        site,
        required,
        available
    ))]
    OutputExhausted {
        site: String,
        required: usize,
        available: usize,
    },

    #[snafu(display("{}: the message cannot be encoded as MIDI-CI version {}", site, version))]
    UnsupportedVersion { site: String, version: u8 },

    #[snafu(display("{} unknown error", site))]
    Other { site: String },
}

macro_rules! site {
    () => {
        format!("{}:{}", file!(), line!())
    };
}

#[test]
fn site_test() {
    let line = line!() + 1;
    let site = site!();
    assert!(site.contains("error.rs"));
    assert!(site.contains(format!("{}", line).as_str()));
}

#[test]
fn output_exhausted_display_test() {
    fn foo() -> LibResult<u64> {
        OutputExhausted {
            site: site!(),
            required: 30usize,
            available: 4usize,
        }
        .fail()
    }
    let result = foo();
    assert!(result.is_err());
    let message = format!("{}", Error(result.err().unwrap()));
    assert!(message.contains("30 bytes required"));
    assert!(message.contains("4 available"));
}
