#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (&[u8], i16, i16, u16)| {
    let (data, start, end, ratio) = input;
    let Ok(mut image) = c64tap::decode(data) else {
        return;
    };

    image.crop(start as i64, end as i64);
    image.scale(ratio as f64 / 1000.0 + 0.001);
    assert_eq!(image.declared_length, image.encoded_length());

    let bytes = c64tap::encode(&image);
    assert_eq!(c64tap::decode(&bytes).unwrap(), image);
});
