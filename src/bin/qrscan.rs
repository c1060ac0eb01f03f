//! Decode a QR code from an image file and print the payload.

use std::process::ExitCode;

use qrscan::scan::decode_image_bytes;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: qrscan <image-file>");
        return ExitCode::from(2);
    };

    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("error: cannot read {path}: {err}");
            return ExitCode::from(2);
        }
    };

    match decode_image_bytes(&bytes) {
        Ok(decoded) => {
            println!("{}", decoded.text);
            eprintln!(
                "version {} EC {:?} mask {}",
                decoded.version.number(),
                decoded.ec_level,
                decoded.mask.index()
            );
            ExitCode::SUCCESS
        }
        Err(failure) => {
            eprintln!("error: {failure}");
            ExitCode::FAILURE
        }
    }
}
