#![no_main]

use libfuzzer_sys::fuzz_target;
use zugferd::{CiiVersion23Reader, InvoiceReader, ZugferdFormat, ZugferdVersion};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Parse → serialize → parse must not panic at any step.
        if let Ok(invoice) = CiiVersion23Reader.parse_str(s) {
            if let Ok(xml2) = invoice.to_xml(ZugferdVersion::Version23, ZugferdFormat::Cii) {
                let _ = CiiVersion23Reader.parse_str(&xml2);
            }
        }
    }
});
