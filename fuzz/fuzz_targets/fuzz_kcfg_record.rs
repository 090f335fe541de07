#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(record) = serde_json::from_slice::<reach_kcfg::KcfgRecord>(data) {
        if let Ok(kcfg) = reach_kcfg::Kcfg::from_record(record) {
            // Structural queries over a restored graph must never panic.
            for leaf in kcfg.leaves() {
                let _ = kcfg.zero_depth_between(&leaf.id, &leaf.id);
            }
            let _ = kcfg.to_record();
        }
    }
});
