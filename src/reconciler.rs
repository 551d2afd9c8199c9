//! Ordered-list reconciliation for the playlist view.
//!
//! Translates drag, drop and click gestures on the rendered list into the
//! position arguments the daemon's mutation commands expect. The client
//! never computes the authoritative order itself: it proposes a mutation
//! and waits for the next playlist snapshot.
//!
//! The daemon computes `Pos` against the list as it stands after the
//! source range was taken out, so moving a block downward must correct the
//! target position by the width of the block (the shift rule). Moving
//! upward needs no correction.

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    protocol::{Command, Track},
    selection::Selection,
};

/// Drag payload, scoped to the local transfer buffer, never the network.
///
/// Serializes as `{"type": "uris"|"indexes"|"id", "data": ...}`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Gesture {
    /// Source uris dragged out of the database browser. Purely an
    /// insertion; the uris have no positional meaning.
    Uris(Vec<String>),

    /// A contiguous block `[start, end)` of selected playlist rows.
    Indexes { start: usize, end: usize },

    /// A single playlist row, identified by its stable track id.
    Id(u64),
}

impl Gesture {
    /// Decodes a transfer payload defensively.
    pub fn from_json(json: &str) -> Result<Self> {
        let gesture = serde_json::from_str(json)?;
        Ok(gesture)
    }

    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string(self)?;
        Ok(json)
    }
}

/// Reconciles gestures on the rendered playlist against the last
/// authoritative snapshot.
#[derive(Debug, Default)]
pub struct Reconciler {
    tracks: Vec<Track>,
    selection: Selection,
}

impl Reconciler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the snapshot wholesale. Any selection is void after a
    /// structural update.
    pub fn replace(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.selection.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Applies a primary click on a row.
    pub fn click(&mut self, index: usize) {
        if index >= self.tracks.len() {
            debug!("click on row {index} outside the list");
            return;
        }
        self.selection.click(index);
    }

    /// A double click never toggles; it always clears the selection.
    pub fn double_click(&mut self) {
        self.selection.clear();
    }

    /// Clear button: wipe the whole playlist. The empty snapshot that
    /// follows voids the selection, but drop it now so no stale indexes
    /// linger while the round trip is in flight.
    pub fn clear_all(&mut self) -> Command {
        self.selection.clear();
        Command::Clear
    }

    /// Double click on a row: play it and drop the selection.
    pub fn play_row(&mut self, index: usize) -> Option<Command> {
        self.selection.clear();

        let Some(track) = self.tracks.get(index) else {
            debug!("play on row {index} outside the list");
            return None;
        };
        Some(Command::PlayId { id: track.id })
    }

    /// Classifies a drag starting on the given row.
    ///
    /// A selected row inside a contiguous selection exports the whole
    /// block; a non-contiguous selection would silently sweep unselected
    /// rows into the block, so it degrades to a single-row gesture.
    pub fn drag_from(&self, index: usize) -> Option<Gesture> {
        let Some(track) = self.tracks.get(index) else {
            debug!("drag from row {index} outside the list");
            return None;
        };

        if self.selection.contains(index) {
            if let Some((start, end)) = self.selection.contiguous_range() {
                return Some(Gesture::Indexes { start, end });
            }
            warn!("selection is not contiguous, dragging row {index} alone");
        }

        Some(Gesture::Id(track.id))
    }

    /// Maps a drop onto visual slot `pos` to a mutation command. `None`
    /// for `pos` means past the end of the list.
    pub fn drop_at(&self, gesture: Gesture, pos: Option<usize>) -> Option<Command> {
        let pos = pos.unwrap_or_else(|| self.tracks.len());

        match gesture {
            Gesture::Uris(uris) => Some(Command::AddMulti {
                uris,
                pos: i64::try_from(pos).unwrap_or(-1),
            }),
            Gesture::Indexes { start, end } => Self::move_range(start, end, pos),
            Gesture::Id(id) => self.move_id(id, pos),
        }
    }

    /// Maps a drop outside the list to a removal. The original bounds are
    /// sent as captured; no shift applies to a delete.
    pub fn drop_outside(&self, gesture: Gesture) -> Option<Command> {
        match gesture {
            Gesture::Indexes { start, end } => Some(Command::Delete { start, end }),
            Gesture::Id(id) => Some(Command::DeleteId { id }),
            Gesture::Uris(_) => {
                debug!("uri gesture dropped outside the list");
                None
            }
        }
    }

    /// Like [`drop_at`](Self::drop_at), decoding the raw transfer payload
    /// first. A payload that fails to decode is discarded.
    pub fn drop_json_at(&self, json: &str, pos: Option<usize>) -> Option<Command> {
        match Gesture::from_json(json) {
            Ok(gesture) => self.drop_at(gesture, pos),
            Err(e) => {
                debug!("discarding drop payload: {e}");
                None
            }
        }
    }

    /// Like [`drop_outside`](Self::drop_outside) for a raw transfer payload.
    pub fn drop_json_outside(&self, json: &str) -> Option<Command> {
        match Gesture::from_json(json) {
            Ok(gesture) => self.drop_outside(gesture),
            Err(e) => {
                debug!("discarding drop payload: {e}");
                None
            }
        }
    }

    /// Shift rule for a block move: with the source entirely above the
    /// target, the effective insertion slot moves up by the block width.
    ///
    /// A target inside the dragged block is an identity move whose shifted
    /// position would go negative, so it degrades to a no-op.
    fn move_range(start: usize, end: usize, pos: usize) -> Option<Command> {
        if start < pos && pos < end {
            debug!("drop into the dragged range [{start}, {end}) is a no-op");
            return None;
        }

        let pos = if start < pos { pos - (end - start) } else { pos };
        Some(Command::Move { start, end, pos })
    }

    /// Single-row analogue of the shift rule: width one, so the slot moves
    /// up by one when the source sits above the target.
    fn move_id(&self, id: u64, pos: usize) -> Option<Command> {
        let Some(index) = self.tracks.iter().position(|track| track.id == id) else {
            // The playlist may have changed between gesture capture and
            // drop; degrade to a no-op.
            debug!("invalid track id {id} in drop");
            return None;
        };

        let pos = if index < pos { pos - 1 } else { pos };
        Some(Command::MoveId { id, pos })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: u64, file: &str) -> Track {
        Track {
            id,
            file: file.to_owned(),
            title: None,
            album: None,
            artist: None,
            time: None,
        }
    }

    fn reconciler(len: u64) -> Reconciler {
        let mut reconciler = Reconciler::new();
        reconciler.replace((0..len).map(|i| track(100 + i, "x.flac")).collect());
        reconciler
    }

    #[test]
    fn moving_a_range_downward_corrects_for_its_own_width() {
        let r = reconciler(10);
        let command = r.drop_at(Gesture::Indexes { start: 2, end: 5 }, Some(7));
        assert_eq!(
            command,
            Some(Command::Move {
                start: 2,
                end: 5,
                pos: 4
            })
        );
    }

    #[test]
    fn moving_a_range_upward_needs_no_correction() {
        let r = reconciler(10);
        let command = r.drop_at(Gesture::Indexes { start: 6, end: 8 }, Some(2));
        assert_eq!(
            command,
            Some(Command::Move {
                start: 6,
                end: 8,
                pos: 2
            })
        );
    }

    #[test]
    fn dropping_a_range_into_itself_is_a_no_op() {
        let r = reconciler(10);
        // Slot 2 sits inside [1, 5); the shifted position would be -2.
        assert_eq!(r.drop_at(Gesture::Indexes { start: 1, end: 5 }, Some(2)), None);

        // The block boundaries are identity moves, not interior drops.
        let command = r.drop_at(Gesture::Indexes { start: 1, end: 5 }, Some(5));
        assert_eq!(
            command,
            Some(Command::Move {
                start: 1,
                end: 5,
                pos: 1
            })
        );
    }

    #[test]
    fn clear_emits_the_wipe_command_and_drops_the_selection() {
        let mut r = reconciler(4);
        r.click(1);
        assert_eq!(r.clear_all(), Command::Clear);
        assert!(r.selection().is_empty());
    }

    #[test]
    fn moving_a_row_downward_shifts_by_one() {
        let r = reconciler(10);
        // Row id 103 sits at index 3.
        let command = r.drop_at(Gesture::Id(103), Some(5));
        assert_eq!(command, Some(Command::MoveId { id: 103, pos: 4 }));
    }

    #[test]
    fn moving_a_row_upward_keeps_the_slot() {
        let r = reconciler(10);
        let command = r.drop_at(Gesture::Id(105), Some(1));
        assert_eq!(command, Some(Command::MoveId { id: 105, pos: 1 }));
    }

    #[test]
    fn uri_drop_past_the_end_appends_at_list_length() {
        let r = reconciler(4);
        let command = r.drop_at(Gesture::Uris(vec!["new.flac".to_owned()]), None);
        assert_eq!(
            command,
            Some(Command::AddMulti {
                uris: vec!["new.flac".to_owned()],
                pos: 4
            })
        );
    }

    #[test]
    fn outside_drop_deletes_with_unshifted_bounds() {
        let r = reconciler(10);
        let command = r.drop_outside(Gesture::Indexes { start: 2, end: 5 });
        assert_eq!(command, Some(Command::Delete { start: 2, end: 5 }));

        let command = r.drop_outside(Gesture::Id(107));
        assert_eq!(command, Some(Command::DeleteId { id: 107 }));
    }

    #[test]
    fn outside_drop_of_uris_is_a_no_op() {
        let r = reconciler(10);
        assert_eq!(r.drop_outside(Gesture::Uris(vec!["a".to_owned()])), None);
    }

    #[test]
    fn contiguous_selection_drags_as_a_block() {
        let mut r = reconciler(10);
        r.click(2);
        r.click(5);
        assert_eq!(r.drag_from(3), Some(Gesture::Indexes { start: 2, end: 6 }));
    }

    #[test]
    fn unselected_row_drags_alone() {
        let mut r = reconciler(10);
        r.click(2);
        r.click(5);
        assert_eq!(r.drag_from(7), Some(Gesture::Id(107)));
    }

    #[test]
    fn vanished_track_id_degrades_to_no_op() {
        let r = reconciler(4);
        assert_eq!(r.drop_at(Gesture::Id(999), Some(2)), None);
    }

    #[test]
    fn snapshot_replacement_voids_the_selection() {
        let mut r = reconciler(10);
        r.click(2);
        assert!(!r.selection().is_empty());
        r.replace(vec![track(1, "a.flac")]);
        assert!(r.selection().is_empty());
    }

    #[test]
    fn play_row_uses_the_track_id_and_clears_selection() {
        let mut r = reconciler(4);
        r.click(1);
        assert_eq!(r.play_row(2), Some(Command::PlayId { id: 102 }));
        assert!(r.selection().is_empty());
        assert_eq!(r.play_row(9), None);
    }

    #[test]
    fn gesture_payload_shape_is_stable() {
        let json = Gesture::Indexes { start: 1, end: 3 }.to_json().unwrap();
        assert_eq!(json, r#"{"type":"indexes","data":{"start":1,"end":3}}"#);

        let gesture = Gesture::from_json(r#"{"type":"id","data":42}"#).unwrap();
        assert_eq!(gesture, Gesture::Id(42));
    }

    #[test]
    fn malformed_payloads_are_discarded() {
        let r = reconciler(4);
        assert_eq!(r.drop_json_at("]", Some(0)), None);
        assert_eq!(r.drop_json_outside(r#"{"type":"bogus","data":0}"#), None);
    }
}
