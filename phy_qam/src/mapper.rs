//! Constellation mapper
//!
//! A [`Mapper`] carries its modulation order as data together with the
//! full index-ordered constellation table, so a modulator and a
//! demodulator sharing one mapper can never disagree on the order.
//! The table is produced by a replaceable generator function; the
//! default is the Gray-coded square construction below.

use std::fmt;
use std::sync::Arc;

use crate::error::PhyError;
use crate::iq::IqSample;

/// Supported modulation orders. Fixed, closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModulationOrder {
    /// 4 points, 2 bits per symbol
    Qpsk,
    /// 16 points, 4 bits per symbol
    Qam16,
    /// 64 points, 6 bits per symbol
    Qam64,
}

impl ModulationOrder {
    /// All orders, in sweep order.
    pub const ALL: [ModulationOrder; 3] = [
        ModulationOrder::Qpsk,
        ModulationOrder::Qam16,
        ModulationOrder::Qam64,
    ];

    /// Number of constellation points (M).
    pub fn points(self) -> usize {
        match self {
            ModulationOrder::Qpsk => 4,
            ModulationOrder::Qam16 => 16,
            ModulationOrder::Qam64 => 64,
        }
    }

    /// log2(M)
    pub fn bits_per_symbol(self) -> u32 {
        match self {
            ModulationOrder::Qpsk => 2,
            ModulationOrder::Qam16 => 4,
            ModulationOrder::Qam64 => 6,
        }
    }
}

impl fmt::Display for ModulationOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModulationOrder::Qpsk => "QPSK",
            ModulationOrder::Qam16 => "QAM16",
            ModulationOrder::Qam64 => "QAM64",
        };
        f.write_str(name)
    }
}

/// Strategy for producing a constellation table: index -> point, one
/// entry per symbol index in `[0, M)`.
pub type ConstellationFn = Arc<dyn Fn(ModulationOrder) -> Vec<IqSample> + Send + Sync>;

/// Owns a constellation table and the generator that produced it.
///
/// Read-only after construction; wrap in an [`Arc`] to share between a
/// modulator and a demodulator.
pub struct Mapper {
    order: ModulationOrder,
    points: Vec<IqSample>,
    generator: ConstellationFn,
}

impl Mapper {
    /// Mapper with the default Gray-coded constellation for `order`.
    pub fn new(order: ModulationOrder) -> Self {
        let generator: ConstellationFn = Arc::new(default_constellation);
        let points = generator(order);
        Self {
            order,
            points,
            generator,
        }
    }

    /// Replace the generator and regenerate the table immediately.
    ///
    /// The new table must hold exactly one point per symbol index;
    /// a generator producing any other size is rejected and the
    /// current table stays in place.
    pub fn set_generator(&mut self, generator: ConstellationFn) -> Result<(), PhyError> {
        let points = generator(self.order);
        if points.len() != self.order.points() {
            return Err(PhyError::ConstellationSizeMismatch {
                order: self.order,
                expected: self.order.points(),
                actual: points.len(),
            });
        }
        self.generator = generator;
        self.points = points;
        Ok(())
    }

    pub fn order(&self) -> ModulationOrder {
        self.order
    }

    pub fn bits_per_symbol(&self) -> u32 {
        self.order.bits_per_symbol()
    }

    /// The full table, ordered by symbol index.
    pub fn constellation(&self) -> &[IqSample] {
        &self.points
    }

    /// Point for a symbol index. The index is masked to the order's
    /// range, so every group value maps somewhere.
    pub fn point(&self, index: u32) -> IqSample {
        self.points[index as usize & (self.order.points() - 1)]
    }
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("order", &self.order)
            .field("points", &self.points.len())
            .finish()
    }
}

/// Default Gray-coded constellation for an order.
///
/// QPSK keeps the classic explicit table (index high bit picks the I
/// sign, low bit the Q sign):
///
/// ```text
/// 00 -> (-1, -1)    01 -> (-1,  1)
/// 10 -> ( 1, -1)    11 -> ( 1,  1)
/// ```
///
/// The square orders use the binary-reflected Gray code of the index,
/// split evenly between the axes.
pub fn default_constellation(order: ModulationOrder) -> Vec<IqSample> {
    match order {
        ModulationOrder::Qpsk => vec![
            IqSample::new(-1.0, -1.0),
            IqSample::new(-1.0, 1.0),
            IqSample::new(1.0, -1.0),
            IqSample::new(1.0, 1.0),
        ],
        ModulationOrder::Qam16 => gray_square(order),
        ModulationOrder::Qam64 => gray_square(order),
    }
}

/// Gray-coded square grid: `g = idx ^ (idx >> 1)`, low half of `g`
/// drives the in-phase axis, high half the quadrature axis. Within an
/// axis the low bits pick an odd magnitude (1, 3, 5, 7) and the top
/// bit picks the sign (0 -> negative).
fn gray_square(order: ModulationOrder) -> Vec<IqSample> {
    let half = order.bits_per_symbol() / 2;
    let axis_mask = (1u32 << half) - 1;
    let mag_mask = axis_mask >> 1;
    let sign_bit = 1u32 << (half - 1);

    (0..order.points() as u32)
        .map(|idx| {
            let gray = idx ^ (idx >> 1);
            let x_idx = gray & axis_mask;
            let y_idx = (gray >> half) & axis_mask;

            let mut x = f64::from(2 * (x_idx & mag_mask) + 1);
            let mut y = f64::from(2 * (y_idx & mag_mask) + 1);
            if x_idx & sign_bit == 0 {
                x = -x;
            }
            if y_idx & sign_bit == 0 {
                y = -y;
            }
            IqSample::new(x, y)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_set(order: ModulationOrder) -> Vec<f64> {
        match order {
            ModulationOrder::Qpsk => vec![-1.0, 1.0],
            ModulationOrder::Qam16 => vec![-3.0, -1.0, 1.0, 3.0],
            ModulationOrder::Qam64 => vec![-7.0, -5.0, -3.0, -1.0, 1.0, 3.0, 5.0, 7.0],
        }
    }

    #[test]
    fn test_orders() {
        assert_eq!(ModulationOrder::Qpsk.points(), 4);
        assert_eq!(ModulationOrder::Qpsk.bits_per_symbol(), 2);
        assert_eq!(ModulationOrder::Qam16.points(), 16);
        assert_eq!(ModulationOrder::Qam16.bits_per_symbol(), 4);
        assert_eq!(ModulationOrder::Qam64.points(), 64);
        assert_eq!(ModulationOrder::Qam64.bits_per_symbol(), 6);
    }

    #[test]
    fn test_qpsk_table() {
        let mapper = Mapper::new(ModulationOrder::Qpsk);
        assert_eq!(mapper.point(0b00), IqSample::new(-1.0, -1.0));
        assert_eq!(mapper.point(0b01), IqSample::new(-1.0, 1.0));
        assert_eq!(mapper.point(0b10), IqSample::new(1.0, -1.0));
        assert_eq!(mapper.point(0b11), IqSample::new(1.0, 1.0));
    }

    #[test]
    fn test_qam16_known_points() {
        let mapper = Mapper::new(ModulationOrder::Qam16);
        // gray(0b1010) = 0b1111 -> both axes at +3
        assert_eq!(mapper.point(0b1010), IqSample::new(3.0, 3.0));
        // gray(0b1100) = 0b1010 -> both axes at +1
        assert_eq!(mapper.point(0b1100), IqSample::new(1.0, 1.0));
        // gray(0) = 0 -> both axes at -1
        assert_eq!(mapper.point(0b0000), IqSample::new(-1.0, -1.0));
    }

    #[test]
    fn test_full_and_unique_tables() {
        for order in ModulationOrder::ALL {
            let mapper = Mapper::new(order);
            let points = mapper.constellation();
            assert_eq!(points.len(), order.points(), "{order}");

            for (a_idx, a) in points.iter().enumerate() {
                for b in &points[a_idx + 1..] {
                    assert_ne!(a, b, "duplicate point in {order}");
                }
            }
        }
    }

    #[test]
    fn test_coordinates_on_odd_levels() {
        for order in ModulationOrder::ALL {
            let levels = level_set(order);
            for point in Mapper::new(order).constellation() {
                assert!(levels.contains(&point.i), "{order}: bad I level {}", point.i);
                assert!(levels.contains(&point.q), "{order}: bad Q level {}", point.q);
            }
        }
    }

    #[test]
    fn test_gray_neighbors_change_one_axis() {
        // Consecutive indices have Gray codes one bit apart, so their
        // points must differ on exactly one axis.
        for order in [ModulationOrder::Qam16, ModulationOrder::Qam64] {
            let points = Mapper::new(order).constellation().to_vec();
            for pair in points.windows(2) {
                let i_changed = pair[0].i != pair[1].i;
                let q_changed = pair[0].q != pair[1].q;
                assert!(i_changed ^ q_changed, "{order}: {:?} -> {:?}", pair[0], pair[1]);
            }
        }
    }

    #[test]
    fn test_qpsk_single_bit_flips() {
        // For QPSK, flipping one index bit flips exactly one sign.
        let points = Mapper::new(ModulationOrder::Qpsk).constellation().to_vec();
        for idx in 0..4usize {
            for bit in 0..2 {
                let other = idx ^ (1 << bit);
                let a = points[idx];
                let b = points[other];
                let changed = usize::from(a.i != b.i) + usize::from(a.q != b.q);
                assert_eq!(changed, 1, "{idx:02b} vs {other:02b}");
            }
        }
    }

    #[test]
    fn test_point_masks_index() {
        let mapper = Mapper::new(ModulationOrder::Qpsk);
        assert_eq!(mapper.point(4), mapper.point(0));
        assert_eq!(mapper.point(7), mapper.point(3));
    }

    #[test]
    fn test_set_generator_regenerates() {
        let mut mapper = Mapper::new(ModulationOrder::Qpsk);
        mapper
            .set_generator(Arc::new(|order| {
                (0..order.points())
                    .map(|idx| IqSample::new(idx as f64, -(idx as f64)))
                    .collect()
            }))
            .unwrap();

        assert_eq!(mapper.point(0), IqSample::new(0.0, 0.0));
        assert_eq!(mapper.point(3), IqSample::new(3.0, -3.0));
        assert_eq!(mapper.order(), ModulationOrder::Qpsk);
    }

    #[test]
    fn test_set_generator_rejects_wrong_table_size() {
        let mut mapper = Mapper::new(ModulationOrder::Qpsk);

        // Empty and undersized tables are both rejected; the current
        // table survives, so lookups keep working.
        let empty = mapper.set_generator(Arc::new(|_| Vec::new()));
        assert!(matches!(
            empty,
            Err(PhyError::ConstellationSizeMismatch {
                order: ModulationOrder::Qpsk,
                expected: 4,
                actual: 0,
            })
        ));

        let undersized = mapper.set_generator(Arc::new(|_| {
            vec![
                IqSample::new(0.0, 0.0),
                IqSample::new(1.0, 1.0),
                IqSample::new(2.0, 2.0),
            ]
        }));
        assert!(matches!(
            undersized,
            Err(PhyError::ConstellationSizeMismatch { actual: 3, .. })
        ));

        assert_eq!(mapper.constellation().len(), 4);
        assert_eq!(mapper.point(0b10), IqSample::new(1.0, -1.0));
    }
}
