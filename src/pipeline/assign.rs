//! Hand assignment - deciding which detection is the left hand and which is the right
//!
//! Tracker-provided handedness labels are unreliable under hand crossing and
//! mirrored camera views, so two-hand frames are assigned positionally (sorted
//! by x) and the label is ignored. Hands practically never cross while holding
//! an imaginary wheel, which makes the positional rule a robust approximation.
//! Single-hand frames have no positional information, so the label is trusted
//! there; an unlabeled single detection is dropped rather than guessed.

use crate::source::{Handedness, RawHand};

/// Left/right hand slots for one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignedHands {
    pub left: Option<RawHand>,
    pub right: Option<RawHand>,
}

impl AssignedHands {
    /// True when both slots are filled, i.e. a steering angle can be computed.
    pub fn is_pair(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }
}

/// Assign raw detections to left/right slots.
///
/// Rules, in priority order:
/// - 0 detections: both slots empty.
/// - 2 detections: lower-x detection is `left`, regardless of any label.
/// - 1 detection: placed per its label; dropped if the label is missing.
///
/// Detections past the first two are ignored (the source contract is 0-2
/// hands per frame).
pub fn assign_hands(hands: &[RawHand]) -> AssignedHands {
    match hands {
        [] => AssignedHands::default(),
        [only] => match only.label {
            Some(Handedness::Left) => AssignedHands {
                left: Some(*only),
                right: None,
            },
            Some(Handedness::Right) => AssignedHands {
                left: None,
                right: Some(*only),
            },
            None => AssignedHands::default(),
        },
        [a, b, ..] => {
            let (left, right) = if a.x <= b.x { (a, b) } else { (b, a) };
            AssignedHands {
                left: Some(*left),
                right: Some(*right),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(x: f32, y: f32, label: Option<Handedness>) -> RawHand {
        RawHand { x, y, label }
    }

    #[test]
    fn test_no_hands() {
        let assigned = assign_hands(&[]);
        assert_eq!(assigned, AssignedHands::default());
        assert!(!assigned.is_pair());
    }

    #[test]
    fn test_two_hands_sorted_by_x() {
        let a = hand(0.7, 0.5, None);
        let b = hand(0.2, 0.5, None);

        let assigned = assign_hands(&[a, b]);
        assert_eq!(assigned.left, Some(b));
        assert_eq!(assigned.right, Some(a));
        assert!(assigned.is_pair());
    }

    #[test]
    fn test_two_hands_labels_are_ignored() {
        // Labels say the opposite of the positions; positions win.
        let mislabeled_right = hand(0.1, 0.5, Some(Handedness::Right));
        let mislabeled_left = hand(0.9, 0.5, Some(Handedness::Left));

        let assigned = assign_hands(&[mislabeled_right, mislabeled_left]);
        assert_eq!(assigned.left, Some(mislabeled_right));
        assert_eq!(assigned.right, Some(mislabeled_left));
    }

    #[test]
    fn test_single_hand_trusts_label() {
        let left = hand(0.8, 0.4, Some(Handedness::Left));
        let assigned = assign_hands(&[left]);
        assert_eq!(assigned.left, Some(left));
        assert_eq!(assigned.right, None);

        let right = hand(0.1, 0.4, Some(Handedness::Right));
        let assigned = assign_hands(&[right]);
        assert_eq!(assigned.left, None);
        assert_eq!(assigned.right, Some(right));
    }

    #[test]
    fn test_single_unlabeled_hand_is_dropped() {
        let assigned = assign_hands(&[hand(0.5, 0.5, None)]);
        assert_eq!(assigned, AssignedHands::default());
    }

    #[test]
    fn test_extra_detections_are_ignored() {
        let a = hand(0.3, 0.5, None);
        let b = hand(0.6, 0.5, None);
        let ghost = hand(0.9, 0.9, None);

        let assigned = assign_hands(&[a, b, ghost]);
        assert_eq!(assigned.left, Some(a));
        assert_eq!(assigned.right, Some(b));
    }
}
