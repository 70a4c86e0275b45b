#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(image) = c64tap::decode(data) {
        let reread = c64tap::decode(&c64tap::encode(&image)).unwrap();
        assert_eq!(reread.pulses, image.pulses);
    }
});
