use std::io;
use std::path::Path;
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

/// Loads a tokenizer from a model directory or explicit tokenizer.json path.
pub fn load_tokenizer(model_path: &Path) -> io::Result<Tokenizer> {
    let tokenizer_path = if model_path
        .file_name()
        .is_some_and(|name| name == std::ffi::OsStr::new("tokenizer.json"))
    {
        model_path.to_path_buf()
    } else if model_path.is_dir() {
        model_path.join("tokenizer.json")
    } else {
        model_path
            .parent()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Model path has no parent"))?
            .join("tokenizer.json")
    };

    Tokenizer::from_file(&tokenizer_path).map_err(io::Error::other)
}

/// Loads a tokenizer that always emits exactly `window` tokens per input.
///
/// Longer inputs are truncated and shorter ones right-padded with `[PAD]`; the attention
/// mask marks which positions are real.
pub fn load_tokenizer_fixed_window(model_path: &Path, window: usize) -> io::Result<Tokenizer> {
    let mut tokenizer = load_tokenizer(model_path)?;

    let truncation = TruncationParams {
        max_length: window,
        ..Default::default()
    };

    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| io::Error::other(format!("Failed to configure truncation: {}", e)))?;

    let pad_id = tokenizer.token_to_id("[PAD]").unwrap_or(0);
    tokenizer.with_padding(Some(PaddingParams {
        strategy: PaddingStrategy::Fixed(window),
        pad_id,
        pad_token: "[PAD]".to_string(),
        ..Default::default()
    }));

    Ok(tokenizer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_MAX_SEQ_LEN;
    use tempfile::TempDir;

    const WORDS: [&str; 8] = ["plants", "need", "light", "water", "and", "air", "to", "grow"];

    fn write_word_level_tokenizer(dir: &Path) {
        let mut vocab = serde_json::Map::new();
        vocab.insert("[PAD]".to_string(), 0.into());
        vocab.insert("[UNK]".to_string(), 1.into());
        for (i, word) in WORDS.iter().enumerate() {
            vocab.insert(word.to_string(), (i as u64 + 2).into());
        }

        let tokenizer = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [],
            "normalizer": null,
            "pre_tokenizer": { "type": "Whitespace" },
            "post_processor": null,
            "decoder": null,
            "model": { "type": "WordLevel", "vocab": vocab, "unk_token": "[UNK]" }
        });
        std::fs::write(dir.join("tokenizer.json"), tokenizer.to_string()).unwrap();
    }

    #[test]
    fn test_short_input_is_padded_to_window() {
        let dir = TempDir::new().unwrap();
        write_word_level_tokenizer(dir.path());

        let tokenizer = load_tokenizer_fixed_window(dir.path(), DEFAULT_MAX_SEQ_LEN).unwrap();
        let encoding = tokenizer.encode("plants need light", true).unwrap();

        assert_eq!(encoding.get_ids().len(), DEFAULT_MAX_SEQ_LEN);
        assert_eq!(&encoding.get_ids()[..3], &[2, 3, 4]);
        assert!(encoding.get_ids()[3..].iter().all(|&id| id == 0));

        let mask = encoding.get_attention_mask();
        assert_eq!(mask.len(), DEFAULT_MAX_SEQ_LEN);
        assert_eq!(&mask[..3], &[1, 1, 1]);
        assert!(mask[3..].iter().all(|&m| m == 0));
    }

    #[test]
    fn test_long_input_is_truncated_to_window() {
        let dir = TempDir::new().unwrap();
        write_word_level_tokenizer(dir.path());

        let text = WORDS.iter().cycle().take(80).copied().collect::<Vec<_>>().join(" ");
        let tokenizer = load_tokenizer_fixed_window(dir.path(), DEFAULT_MAX_SEQ_LEN).unwrap();
        let encoding = tokenizer.encode(text.as_str(), true).unwrap();

        assert_eq!(encoding.get_ids().len(), DEFAULT_MAX_SEQ_LEN);
        assert!(encoding.get_attention_mask().iter().all(|&m| m == 1));
        assert_eq!(encoding.get_ids()[49], 3);
    }

    #[test]
    fn test_explicit_tokenizer_path_is_accepted() {
        let dir = TempDir::new().unwrap();
        write_word_level_tokenizer(dir.path());

        let tokenizer = load_tokenizer(&dir.path().join("tokenizer.json")).unwrap();
        assert_eq!(tokenizer.token_to_id("[PAD]"), Some(0));
    }
}
