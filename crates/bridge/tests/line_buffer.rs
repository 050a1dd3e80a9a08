use naclfs_bridge::LineBuffer;
use proptest::prelude::*;

proptest! {
    /// However the stream is chunked, flushed lines match splitting the whole
    /// input at once, and only the final fragment stays buffered.
    #[test]
    fn chunking_does_not_change_lines(
        text in "[a-c\n]{0,64}",
        cuts in proptest::collection::vec(0usize..=64, 0..8),
    ) {
        let mut cuts: Vec<usize> = cuts.into_iter().map(|c| c.min(text.len())).collect();
        cuts.push(text.len());
        cuts.sort_unstable();

        let mut buf = LineBuffer::new();
        let mut flushed = Vec::new();
        let mut start = 0;
        for cut in cuts {
            flushed.extend(buf.push(&text[start..cut]));
            start = cut;
        }

        let mut expected: Vec<&str> = text.split('\n').collect();
        let tail = expected.pop().unwrap_or_default();
        prop_assert_eq!(flushed, expected);
        prop_assert_eq!(buf.pending(), tail);
    }
}
