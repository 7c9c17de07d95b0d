//! Cursor builder, cursor cache and cursor visibility.
//!
//! The remote session sends cursor bitmaps bottom-up; the presenter
//! wants them top-down. [`build_cursor`] does that conversion and
//! [`CursorState`] keeps every built cursor by its remote index so that
//! later cache hits can re-select it without a new bitmap.

use std::collections::HashMap;

use crate::error::CursorError;

/// The only colour depth accepted for cursor bitmaps.
pub const SUPPORTED_CURSOR_BPP: u16 = 32;

// ── RawCursorUpdate ──────────────────────────────────────────────

/// A cursor bitmap as delivered by the remote session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCursorUpdate {
    /// Remote-assigned cache slot.
    pub index: u16,
    pub bits_per_pixel: u16,
    pub hot_x: u16,
    pub hot_y: u16,
    pub width: u16,
    /// Declared height, including one malformed trailing row.
    pub height: u16,
    /// AND mask. Unused: 32 bpp colour data carries its own alpha.
    pub mask: Vec<u8>,
    /// Colour rows, bottom-up, `width * 4` bytes each.
    pub color: Vec<u8>,
}

// ── CursorImage ──────────────────────────────────────────────────

/// A displayable cursor: top-down 32-bit RGBA rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorImage {
    pub width: u16,
    pub height: u16,
    pub hot_x: u16,
    pub hot_y: u16,
    /// `width * height * 4` bytes, origin top-left.
    pub pixels: Vec<u8>,
}

// ── Building ─────────────────────────────────────────────────────

/// Swap row `i` with row `rows - 1 - i` for every `i < rows / 2`.
///
/// Applying it twice restores the input. Bytes past `row_len * rows`
/// are left alone, and a buffer shorter than that is not touched.
pub fn flip_rows(buf: &mut [u8], row_len: usize, rows: usize) {
    let Some(total) = row_len.checked_mul(rows) else {
        return;
    };
    if row_len == 0 || rows < 2 || buf.len() < total {
        return;
    }
    for upper in 0..rows / 2 {
        let lower = rows - 1 - upper;
        let (head, tail) = buf.split_at_mut(lower * row_len);
        head[upper * row_len..(upper + 1) * row_len].swap_with_slice(&mut tail[..row_len]);
    }
}

/// Turn a remote cursor update into a top-down [`CursorImage`].
pub fn build_cursor(raw: &RawCursorUpdate) -> Result<CursorImage, CursorError> {
    if raw.bits_per_pixel != SUPPORTED_CURSOR_BPP {
        return Err(CursorError::UnsupportedDepth(raw.bits_per_pixel));
    }

    // Compatibility shim: the declared height includes a trailing row
    // that renders as garbage. Drop it until upstream explains it.
    let height = raw.height.saturating_sub(1);
    if raw.width == 0 || height == 0 {
        return Err(CursorError::Empty {
            width: raw.width,
            height,
        });
    }

    let row_len = raw.width as usize * 4;
    let expected = row_len * height as usize;
    if raw.color.len() < expected {
        return Err(CursorError::Truncated {
            expected,
            actual: raw.color.len(),
        });
    }

    let mut pixels = raw.color[..expected].to_vec();
    flip_rows(&mut pixels, row_len, height as usize);

    Ok(CursorImage {
        width: raw.width,
        height,
        hot_x: raw.hot_x.min(raw.width - 1),
        hot_y: raw.hot_y.min(height - 1),
        pixels,
    })
}

// ── CursorVisibility ─────────────────────────────────────────────

/// Whether the pointer is drawn over the remote desktop.
///
/// ```text
///  Shown ──pointer-hide──► Hidden
///    ▲                        │
///    └─pointer-update/cached──┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorVisibility {
    #[default]
    Shown,
    Hidden,
}

// ── CursorState ──────────────────────────────────────────────────

/// Cursor cache plus visibility, owned by the dispatcher.
///
/// Cache entries are overwritten by index and never evicted.
#[derive(Debug, Default)]
pub struct CursorState {
    cache: HashMap<u16, CursorImage>,
    visibility: CursorVisibility,
}

impl CursorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visibility(&self) -> CursorVisibility {
        self.visibility
    }

    /// Enter `Hidden`. Returns `true` if the state changed.
    pub fn hide(&mut self) -> bool {
        self.set_visibility(CursorVisibility::Hidden)
    }

    /// Enter `Shown`. Returns `true` if the state changed.
    pub fn show(&mut self) -> bool {
        self.set_visibility(CursorVisibility::Shown)
    }

    fn set_visibility(&mut self, next: CursorVisibility) -> bool {
        let changed = self.visibility != next;
        self.visibility = next;
        changed
    }

    /// Build a cursor from `raw` and store it at `raw.index`.
    ///
    /// A rejected update leaves the cache untouched.
    pub fn update(&mut self, raw: &RawCursorUpdate) -> Result<&CursorImage, CursorError> {
        let image = build_cursor(raw)?;
        self.cache.insert(raw.index, image);
        self.cached(raw.index)
    }

    /// Look up a previously built cursor.
    pub fn cached(&self, index: u16) -> Result<&CursorImage, CursorError> {
        self.cache.get(&index).ok_or(CursorError::CacheMiss(index))
    }

    /// Number of cached cursors.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// `rows` rows of `width` pixels; every byte of row `r` equals `r`.
    fn striped(width: u16, rows: u16) -> Vec<u8> {
        (0..rows)
            .flat_map(|r| std::iter::repeat_n(r as u8, width as usize * 4))
            .collect()
    }

    fn update(index: u16, bpp: u16, width: u16, height: u16) -> RawCursorUpdate {
        RawCursorUpdate {
            index,
            bits_per_pixel: bpp,
            hot_x: 1,
            hot_y: 1,
            width,
            height,
            mask: Vec::new(),
            color: striped(width, height),
        }
    }

    #[test]
    fn flip_exchanges_rows_of_4x4() {
        let mut buf: Vec<u8> = (0u8..64).collect();
        flip_rows(&mut buf, 16, 4);
        let expected: Vec<u8> = [48u8..64, 32..48, 16..32, 0..16]
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(buf, expected);
        assert_eq!(&buf[..16], &[48, 49, 50, 51, 52, 53, 54, 55, 56, 57, 58, 59, 60, 61, 62, 63]);
        assert_eq!(&buf[48..], &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]);
    }

    #[test]
    fn flip_is_its_own_inverse() {
        for rows in [1usize, 2, 3, 4, 7] {
            let original: Vec<u8> = (0..rows * 12).map(|i| (i * 7 % 251) as u8).collect();
            let mut buf = original.clone();
            flip_rows(&mut buf, 12, rows);
            flip_rows(&mut buf, 12, rows);
            assert_eq!(buf, original, "rows = {rows}");
        }
    }

    #[test]
    fn odd_row_count_keeps_middle_row() {
        let mut buf = striped(1, 3);
        flip_rows(&mut buf, 4, 3);
        assert_eq!(buf, vec![2, 2, 2, 2, 1, 1, 1, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn flip_ignores_impossible_geometry() {
        let original: Vec<u8> = (0u8..16).collect();
        let mut buf = original.clone();
        flip_rows(&mut buf, usize::MAX, 2);
        flip_rows(&mut buf, 2, usize::MAX);
        flip_rows(&mut buf, 8, 3);
        assert_eq!(buf, original);
    }

    #[test]
    fn build_drops_trailing_row_and_flips() {
        // Declared 5 rows: the fifth (stripe 4) is the bogus one.
        let image = build_cursor(&update(0, 32, 2, 5)).unwrap();
        assert_eq!(image.height, 4);
        assert_eq!(image.pixels.len(), 2 * 4 * 4);
        let first_bytes: Vec<u8> = image.pixels.chunks(8).map(|row| row[0]).collect();
        assert_eq!(first_bytes, vec![3, 2, 1, 0]);
    }

    #[test]
    fn hot_spot_is_clamped() {
        let mut raw = update(0, 32, 4, 4);
        raw.hot_x = 9;
        raw.hot_y = 3;
        let image = build_cursor(&raw).unwrap();
        assert_eq!((image.hot_x, image.hot_y), (3, 2));
    }

    #[test]
    fn rejects_wrong_depth_and_bad_geometry() {
        assert_eq!(
            build_cursor(&update(0, 24, 4, 4)),
            Err(CursorError::UnsupportedDepth(24))
        );
        assert_eq!(
            build_cursor(&update(0, 32, 4, 1)),
            Err(CursorError::Empty { width: 4, height: 0 })
        );

        let mut raw = update(0, 32, 4, 4);
        raw.color.truncate(10);
        assert_eq!(
            build_cursor(&raw),
            Err(CursorError::Truncated {
                expected: 48,
                actual: 10
            })
        );
    }

    #[test]
    fn rejected_update_leaves_cache_unmodified() {
        let mut state = CursorState::new();
        state.update(&update(3, 32, 2, 3)).unwrap();
        let before = state.cached(3).unwrap().clone();

        assert!(state.update(&update(3, 16, 2, 3)).is_err());
        assert!(state.update(&update(4, 8, 2, 3)).is_err());
        assert_eq!(state.len(), 1);
        assert_eq!(state.cached(3).unwrap(), &before);
        assert_eq!(state.cached(4), Err(CursorError::CacheMiss(4)));
    }

    #[test]
    fn same_index_keeps_latest() {
        let mut state = CursorState::new();
        state.update(&update(1, 32, 2, 3)).unwrap();
        state.update(&update(1, 32, 3, 4)).unwrap();
        assert_eq!(state.len(), 1);
        let image = state.cached(1).unwrap();
        assert_eq!((image.width, image.height), (3, 3));
    }

    #[test]
    fn visibility_transitions() {
        let mut state = CursorState::new();
        assert_eq!(state.visibility(), CursorVisibility::Shown);
        assert!(!state.show());
        assert!(state.hide());
        assert!(!state.hide());
        assert_eq!(state.visibility(), CursorVisibility::Hidden);
        assert!(state.show());
        assert_eq!(state.visibility(), CursorVisibility::Shown);
    }
}
