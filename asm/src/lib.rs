//! Single-pass assembler: ASM text to a 256-byte image.
//!
//! The macro table records every `&NAME` definition as it is seen, and
//! every `@NAME`/`@NAME+N`/`@NAME-N` reference is resolved immediately
//! against the table as it stands at that point in the scan — not
//! deferred to a second pass. This is safe because ASM produced by the
//! code generator always defines a label before referencing it; `@LEN`
//! is special and always resolves against the output length *at the
//! point of use*, which a single forward pass gives for free.

mod error;

pub use error::AssembleError;

use octo::image::{HEADER_END, IP, SIZE, SP};
use octo::{Image, Opcode};
use std::collections::HashMap;
use util::EnumFromStr;

/// Assembles ASM source text into a complete, 256-byte image.
pub fn assemble(source: &str) -> Result<Image, AssembleError> {
    let mut macros = seed_macros();
    let mut bytecode: Vec<u8> = vec![0u8; HEADER_END];

    for line in source.lines() {
        'word: for word in line.split_whitespace() {
            macros.insert("LEN".to_owned(), bytecode.len() as i64);

            if word.starts_with('#') {
                break 'word;
            } else if let Some(name) = word.strip_prefix('&') {
                macros.insert(name.to_owned(), bytecode.len() as i64);
                continue;
            } else if let Some(reference) = word.strip_prefix('@') {
                let value = resolve_reference(reference, &macros)?;
                bytecode.push(value.rem_euclid(256) as u8);
            } else if let Ok(op) = Opcode::from_str(word) {
                bytecode.push(op as u8);
            } else {
                let value: i64 = word
                    .parse()
                    .map_err(|_| AssembleError::BadInteger(word.to_owned()))?;
                bytecode.push(value.rem_euclid(256) as u8);
            }
        }
    }

    finish(bytecode, &macros)
}

fn seed_macros() -> HashMap<String, i64> {
    (0..26)
        .map(|i| (((b'A' + i) as char).to_string(), i64::from(i)))
        .collect()
}

fn resolve_reference(reference: &str, macros: &HashMap<String, i64>) -> Result<i64, AssembleError> {
    let lookup = |name: &str| -> Result<i64, AssembleError> {
        macros
            .get(name)
            .copied()
            .ok_or_else(|| AssembleError::UnknownMacro(name.to_owned()))
    };

    if let Some(plus) = reference.find('+') {
        let (name, shift) = (&reference[..plus], &reference[plus + 1..]);
        let shift: i64 = shift
            .parse()
            .map_err(|_| AssembleError::BadInteger(reference.to_owned()))?;
        Ok(lookup(name)? + shift)
    } else if let Some(minus) = reference.find('-') {
        let (name, shift) = (&reference[..minus], &reference[minus + 1..]);
        let shift: i64 = shift
            .parse()
            .map_err(|_| AssembleError::BadInteger(reference.to_owned()))?;
        Ok(lookup(name)? - shift)
    } else {
        lookup(reference)
    }
}

fn finish(bytecode: Vec<u8>, macros: &HashMap<String, i64>) -> Result<Image, AssembleError> {
    if bytecode.len() > SIZE {
        return Err(AssembleError::CodeTooLarge(bytecode.len()));
    }

    let main = *macros.get("MAIN").ok_or(AssembleError::MissingMain)?;

    let mut bytes = [0u8; SIZE];
    bytes[..bytecode.len()].copy_from_slice(&bytecode);

    let len = bytecode.len();
    let sp = if len % 16 == 0 { len } else { len + (16 - len % 16) };

    bytes[IP] = main.rem_euclid(256) as u8;
    bytes[SP] = sp as u8;

    Ok(Image::new(bytes))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn header_is_zeroed_and_code_starts_at_0x10() {
        let image = assemble("&MAIN\nNOP\nEND").unwrap();
        assert!(image.as_bytes()[..0x0A].iter().all(|&b| b == 0));
        assert_eq!(image.as_bytes()[HEADER_END], Opcode::Nop as u8);
        assert_eq!(image.as_bytes()[HEADER_END + 1], Opcode::End as u8);
    }

    #[test]
    fn ip_is_set_to_main() {
        let image = assemble("NOP\n&MAIN\nEND").unwrap();
        assert_eq!(image.as_bytes()[IP], (HEADER_END + 1) as u8);
    }

    #[test]
    fn sp_rounds_up_to_next_16_byte_boundary() {
        let image = assemble("&MAIN\nEND").unwrap();
        // code is 1 byte at offset 0x10, ending at 0x11 -> next boundary 0x20
        assert_eq!(image.as_bytes()[SP], 0x20);
    }

    #[test]
    fn sp_is_unchanged_when_already_aligned() {
        let mut source = String::from("&MAIN\n");
        for _ in 0..16 {
            source.push_str("NOP\n");
        }
        // 16 code bytes starting at 0x10 -> ends exactly at 0x20
        let image = assemble(&source).unwrap();
        assert_eq!(image.as_bytes()[SP], 0x20);
    }

    #[test]
    fn len_macro_resolves_against_point_of_use() {
        // @LEN immediately after NOP should equal offset of the *next* byte.
        let image = assemble("&MAIN\nJMPC @LEN+2\nNOP").unwrap();
        assert_eq!(image.as_bytes()[HEADER_END + 1], (HEADER_END + 3) as u8);
    }

    #[test]
    fn missing_main_fails_cleanly() {
        assert_eq!(assemble("NOP\nEND"), Err(AssembleError::MissingMain));
    }

    #[test]
    fn comment_consumes_rest_of_line() {
        let image = assemble("&MAIN\nNOP # END SET\nEND").unwrap();
        assert_eq!(image.as_bytes()[HEADER_END], Opcode::Nop as u8);
        assert_eq!(image.as_bytes()[HEADER_END + 1], Opcode::End as u8);
    }

    #[test]
    fn unknown_macro_reference_is_an_error() {
        assert_eq!(
            assemble("&MAIN\nJMPC @NOWHERE"),
            Err(AssembleError::UnknownMacro("NOWHERE".to_owned()))
        );
    }
}
