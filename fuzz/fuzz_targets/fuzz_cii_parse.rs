#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Detection must leave the cursor alone and reading must not panic.
    let mut cursor = Cursor::new(data);
    if zugferd::detect(&mut cursor).is_err() {
        assert_eq!(cursor.position(), 0);
        return;
    }
    let _ = zugferd::InvoiceDescriptor::load(&mut cursor);
});
