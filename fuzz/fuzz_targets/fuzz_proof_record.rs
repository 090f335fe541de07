#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes as a persisted proof must never panic.
    if let Ok(record) = serde_json::from_slice::<reach_proof::ProofRecord>(data) {
        // Restore checks node hashes, dangling successors and refutation
        // declarations; it may reject the record but must not panic.
        if let Ok(proof) = reach_proof::Proof::from_record(record, None) {
            let _ = proof.summary();
            let _ = proof.to_record();
        }
    }
});
