//! Byte-bounded text chunking
//!
//! Amazon Translate rejects requests above a fixed byte size, so documents are
//! cut into chunks before translation. Boundaries prefer paragraph breaks,
//! then sentence breaks. Text is never dropped: a sentence that is too large
//! on its own is emitted as a single over-budget chunk.

/// Ceiling used by the translation workflow (service limit minus headroom).
pub const MAX_CHUNK_BYTES: usize = 4500;

pub const PARAGRAPH_DELIMITER: &str = "\n\n";
pub const SENTENCE_DELIMITER: &str = ". ";

/// Split `text` into chunks whose UTF-8 length does not exceed `max_bytes`.
///
/// Paragraphs are packed greedily and joined with [`PARAGRAPH_DELIMITER`].
/// A paragraph that cannot fit on its own is packed sentence by sentence; the
/// sentences keep their [`SENTENCE_DELIMITER`] so that concatenating the
/// sub-chunks reproduces the paragraph exactly. The last sub-chunk of such a
/// paragraph stays open and may absorb the paragraphs that follow.
///
/// Joining the chunks with [`PARAGRAPH_DELIMITER`] reproduces `text`, so an
/// empty paragraph that fits nowhere becomes an empty chunk.
pub fn split_text(text: &str, max_bytes: usize) -> Vec<String> {
    if text.len() <= max_bytes {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    // None until the first paragraph is placed, so empty paragraphs still
    // contribute their delimiter.
    let mut current: Option<String> = None;

    for paragraph in text.split(PARAGRAPH_DELIMITER) {
        if let Some(open) = current.as_mut() {
            if open.len() + PARAGRAPH_DELIMITER.len() + paragraph.len() <= max_bytes {
                open.push_str(PARAGRAPH_DELIMITER);
                open.push_str(paragraph);
                continue;
            }
            chunks.push(std::mem::take(open));
        }

        current = Some(if paragraph.len() <= max_bytes {
            paragraph.to_string()
        } else {
            pack_sentences(paragraph, max_bytes, &mut chunks)
        });
    }

    if let Some(rest) = current {
        chunks.push(rest);
    }

    chunks
}

/// Pack the sentences of an oversized paragraph, flushing full sub-chunks into
/// `chunks` and returning the trailing, still-open sub-chunk.
fn pack_sentences(paragraph: &str, max_bytes: usize, chunks: &mut Vec<String>) -> String {
    let sentences: Vec<&str> = paragraph.split(SENTENCE_DELIMITER).collect();
    let last = sentences.len() - 1;
    let mut sub_chunk = String::new();

    for (index, sentence) in sentences.iter().enumerate() {
        let delimiter = if index < last { SENTENCE_DELIMITER } else { "" };
        let piece_len = sentence.len() + delimiter.len();

        if !sub_chunk.is_empty() && sub_chunk.len() + piece_len > max_bytes {
            chunks.push(std::mem::take(&mut sub_chunk));
        }

        sub_chunk.push_str(sentence);
        sub_chunk.push_str(delimiter);
    }

    sub_chunk
}
