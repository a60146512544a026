#![no_main]

use libfuzzer_sys::fuzz_target;
use pinlock_core::{Secret, Verdict, Verifier, CODE_LENGTH};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    match Secret::parse(text) {
        Ok(secret) => {
            let trimmed = text.trim();
            assert_eq!(trimmed.len(), CODE_LENGTH);
            assert!(trimmed.chars().all(|c| c.is_ascii_digit()));

            // The parsed secret accepts itself and nothing shorter
            assert!(secret.matches(trimmed));
            let verifier = Verifier::new(secret);
            assert_eq!(verifier.judge(trimmed), Some(Verdict::Success));
            assert_eq!(verifier.judge(&trimmed[..CODE_LENGTH - 1]), None);
        }
        Err(_) => {
            let trimmed = text.trim();
            assert!(
                trimmed.len() != CODE_LENGTH || !trimmed.chars().all(|c| c.is_ascii_digit())
            );
        }
    }
});
