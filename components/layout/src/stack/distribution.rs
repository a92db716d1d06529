//! Apportioning slack and shortfall along a stack's axis.

use core::ops::Range;

use alloc::{vec, vec::Vec};

use super::{OverflowDistribution, StackLayout, StackTraits, UnderflowDistribution};

impl StackLayout {
    /// Resolves each child's span along the stack axis.
    ///
    /// `natural` holds each child's unconstrained length and `traits` its
    /// priorities; `length` is the container's final length. The returned
    /// ranges are in child order and relative to the container's start.
    ///
    /// # Panics
    ///
    /// Panics if `natural` and `traits` differ in length, or if `length` is
    /// NaN.
    #[must_use]
    pub fn axis_ranges(
        &self,
        natural: &[f32],
        traits: &[StackTraits],
        length: f32,
    ) -> Vec<Range<f32>> {
        assert_eq!(natural.len(), traits.len(), "one set of traits per child");
        assert!(!length.is_nan(), "stack length is NaN");

        let count = natural.len();
        if count == 0 {
            return Vec::new();
        }

        let content: f32 = natural.iter().sum();
        let available = length - self.total_spacing(count);

        let mut lengths = natural.to_vec();
        let mut leading = 0.0;
        let mut gap = self.spacing;
        let mut last = LastSpan::Natural;

        if content < available {
            let slack = available - content;
            match self.underflow {
                UnderflowDistribution::SpaceEvenly => {
                    if count > 1 {
                        #[allow(clippy::cast_precision_loss)]
                        let gaps = (count - 1) as f32;
                        gap += slack / gaps;
                        last = LastSpan::Shift;
                    }
                }
                UnderflowDistribution::GrowUniformly => {
                    let weights: Vec<f32> = traits.iter().map(StackTraits::grow_priority).collect();
                    last = grow(&mut lengths, apportion(slack, &weights, None));
                }
                UnderflowDistribution::GrowProportionally => {
                    let weights: Vec<f32> = natural
                        .iter()
                        .zip(traits)
                        .map(|(length, traits)| length * traits.grow_priority())
                        .collect();
                    last = grow(&mut lengths, apportion(slack, &weights, None));
                }
                UnderflowDistribution::JustifyToStart => {}
                UnderflowDistribution::JustifyToCenter => leading = slack / 2.0,
                UnderflowDistribution::JustifyToEnd => leading = slack,
            }
        } else if content > available {
            let shortfall = content - available;
            let weights: Vec<f32> = match self.overflow {
                OverflowDistribution::CondenseUniformly => {
                    traits.iter().map(StackTraits::shrink_priority).collect()
                }
                OverflowDistribution::CondenseProportionally => natural
                    .iter()
                    .zip(traits)
                    .map(|(length, traits)| length * traits.shrink_priority())
                    .collect(),
            };
            let apportioned = apportion(shortfall, &weights, Some(natural));
            if apportioned.complete {
                last = LastSpan::Stretch;
            } else {
                let absorbed: f32 = apportioned.shares.iter().sum();
                tracing::trace!(
                    overflow = shortfall - absorbed,
                    "stack children overflow their container"
                );
            }
            for (length, share) in lengths.iter_mut().zip(apportioned.shares) {
                *length = (*length - share).max(0.0);
            }
        }

        let last_length = lengths[count - 1];
        let mut cursor = leading;
        let mut ranges: Vec<Range<f32>> = lengths
            .into_iter()
            .map(|length| {
                let start = cursor;
                let end = start + length;
                cursor = end + gap;
                start..end
            })
            .collect();

        // Accumulated gaps and shares drift by a few ulps; the span that
        // absorbs the distribution ends exactly at `length`.
        let final_span = &mut ranges[count - 1];
        match last {
            LastSpan::Natural => {}
            LastSpan::Stretch => {
                final_span.start = final_span.start.min(length);
                final_span.end = length;
            }
            LastSpan::Shift => *final_span = (length - last_length).max(0.0)..length,
        }
        ranges
    }
}

/// How the last child's span is settled once the distribution is known.
enum LastSpan {
    /// Left where the cursor put it.
    Natural,
    /// Ends at the container length, keeping its start.
    Stretch,
    /// Ends at the container length, keeping its length.
    Shift,
}

fn grow(lengths: &mut [f32], apportioned: Apportioned) -> LastSpan {
    for (length, share) in lengths.iter_mut().zip(apportioned.shares) {
        *length += share;
    }
    if apportioned.complete {
        LastSpan::Stretch
    } else {
        LastSpan::Natural
    }
}

/// The result of [`apportion`].
#[derive(Debug, PartialEq)]
pub(crate) struct Apportioned {
    pub(crate) shares: Vec<f32>,
    /// True when the whole amount was handed out.
    pub(crate) complete: bool,
}

/// Splits `amount` in proportion to `weights`, never giving participant `i`
/// more than `caps[i]`.
///
/// Participants with zero weight receive nothing. When every weight is zero
/// nothing is distributed, and when every participant is capped the
/// remainder is left undistributed. The last uncapped participant takes
/// whatever the others leave rather than its own proportional share.
pub(crate) fn apportion(amount: f32, weights: &[f32], caps: Option<&[f32]>) -> Apportioned {
    let mut shares = vec![0.0; weights.len()];
    let mut active: Vec<usize> = (0..weights.len()).filter(|&i| weights[i] > 0.0).collect();
    let mut remaining = amount;

    loop {
        if remaining <= 0.0 {
            return Apportioned { shares, complete: true };
        }
        let Some((&last, others)) = active.split_last() else {
            return Apportioned { shares, complete: false };
        };

        let total: f32 = active.iter().map(|&i| weights[i]).sum();
        let share_of = |i: usize| remaining * weights[i] / total;

        let saturated: Vec<usize> = match caps {
            Some(caps) => active
                .iter()
                .copied()
                .filter(|&i| share_of(i) >= caps[i])
                .collect(),
            None => Vec::new(),
        };

        if saturated.is_empty() {
            let mut given = 0.0;
            for &i in others {
                shares[i] = share_of(i);
                given += shares[i];
            }
            shares[last] = (remaining - given).max(0.0);
            return Apportioned { shares, complete: true };
        }

        // Capped participants take their cap; the rest is re-split among
        // the others.
        if let Some(caps) = caps {
            for &i in &saturated {
                shares[i] = caps[i];
                remaining -= caps[i];
            }
        }
        active.retain(|i| !saturated.contains(i));
    }
}
