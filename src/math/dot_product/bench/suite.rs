//! The full comparison: every kernel over every container shape it accepts,
//! on one pair of random vectors.

use super::{run, BenchReport};
use crate::config::BenchConfig;
use crate::error::{Error, Result};
use crate::layout::{random_vec, report, AlignedArray, AlignmentReport, Elem, Span};
use crate::math::dot_product::code::{dot_product_scalar, Isa, KernelSet};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// One row of the comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Case {
    /// Scalar kernel on the owning, unaligned vectors.
    Vector,
    /// Scalar kernel on the fixed-capacity aligned buffers.
    Array,
    /// Scalar kernel on plain slice views of the aligned buffers.
    Span,
    /// Wide kernel on aligned views of the fixed-capacity buffers.
    Wide(Isa),
}

impl Case {
    /// Container shape shown in the report.
    pub fn container(&self) -> &'static str {
        match self {
            Case::Vector => "Vector",
            Case::Array | Case::Wide(_) => "Array",
            Case::Span => "Span",
        }
    }

    pub fn isa(&self) -> Isa {
        match self {
            Case::Wide(isa) => *isa,
            _ => Isa::Scalar,
        }
    }

    /// e.g. `Array  AVX2`.
    pub fn label(&self) -> String {
        format!("{:<6} {}", self.container(), self.isa().label())
    }
}

/// Outcome of one row. A failed row does not stop the suite.
#[derive(Debug)]
pub struct BenchRow {
    pub case: Case,
    pub outcome: Result<BenchReport>,
}

/// Random input vectors in the three container shapes.
///
/// `LINES` fixes the capacity of the aligned buffers at compile time; the
/// logical length may be anything from 1 to `LINES * LANES_PER_LINE`.
pub struct Suite<const LINES: usize> {
    length: usize,
    iterations: usize,
    kernels: KernelSet,
    x_vec: Vec<Elem>,
    y_vec: Vec<Elem>,
    x_arr: AlignedArray<LINES>,
    y_arr: AlignedArray<LINES>,
}

impl<const LINES: usize> Suite<LINES> {
    /// Draw two random vectors of `length` values and copy them into the
    /// aligned buffers.
    pub fn new(length: usize, config: &BenchConfig) -> Result<Self> {
        if length == 0 {
            return Err(Error::InvalidArgument(
                "vector length must be at least 1".to_string(),
            ));
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let x_vec = random_vec(length, &mut rng);
        let y_vec = random_vec(length, &mut rng);
        let x_arr = AlignedArray::from_slice(&x_vec)?;
        let y_arr = AlignedArray::from_slice(&y_vec)?;

        Ok(Self {
            length,
            iterations: config.iterations,
            kernels: KernelSet::compiled(),
            x_vec,
            y_vec,
            x_arr,
            y_arr,
        })
    }

    /// Replace the kernel set, e.g. to run the scalar rows only.
    pub fn with_kernels(mut self, kernels: KernelSet) -> Self {
        self.kernels = kernels;
        self
    }

    /// Logical vector length.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Element count of the aligned buffers, padding included.
    pub fn padded_length(&self) -> usize {
        self.x_arr.capacity()
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn kernels(&self) -> &KernelSet {
        &self.kernels
    }

    /// Alignment of the owning vector `x`.
    pub fn vector_alignment(&self) -> AlignmentReport {
        report(&self.x_vec)
    }

    /// Alignment of the fixed-capacity buffer `x`.
    pub fn array_alignment(&self) -> AlignmentReport {
        report(&self.x_arr)
    }

    /// Rows in run order: the scalar kernel on each shape, then each wide
    /// kernel that is compiled in, narrowest first.
    pub fn cases(&self) -> Vec<Case> {
        let mut cases = vec![Case::Vector, Case::Array, Case::Span];
        cases.extend(
            self.kernels
                .wide()
                .filter(|isa| isa.wide_kernel().is_some())
                .map(Case::Wide),
        );
        cases
    }

    /// Time a single row on the current rayon pool.
    pub fn run_case(&self, case: Case) -> BenchRow {
        let iterations = self.iterations;

        let outcome = match case {
            Case::Vector => run(
                &self.x_vec,
                &self.y_vec,
                dot_product_scalar::<Vec<Elem>>,
                iterations,
            ),
            Case::Array => run(
                &self.x_arr,
                &self.y_arr,
                dot_product_scalar::<AlignedArray<LINES>>,
                iterations,
            ),
            Case::Span => run(
                self.x_arr.as_span(),
                self.y_arr.as_span(),
                dot_product_scalar::<[Elem]>,
                iterations,
            ),
            Case::Wide(isa) => match isa.wide_kernel() {
                Some(kernel) => run(&self.x_arr.view(), &self.y_arr.view(), kernel, iterations),
                None => Err(Error::InvalidArgument(format!(
                    "no {} kernel in this build",
                    isa.name()
                ))),
            },
        };

        BenchRow { case, outcome }
    }

    /// Run every row, handing each one to `on_row` as soon as it finishes.
    pub fn run_all<F: FnMut(&BenchRow)>(&self, mut on_row: F) -> Vec<BenchRow> {
        self.cases()
            .into_iter()
            .map(|case| {
                let row = self.run_case(case);
                on_row(&row);
                row
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::lines_for;

    const LENGTH: usize = 1001;
    const LINES: usize = lines_for(LENGTH);

    fn small_config() -> BenchConfig {
        BenchConfig {
            iterations: 3,
            seed: Some(11),
            ..BenchConfig::default()
        }
    }

    #[test]
    fn test_suite_shapes() {
        let suite = Suite::<LINES>::new(LENGTH, &small_config()).unwrap();
        assert_eq!(suite.length(), 1001);
        assert_eq!(suite.padded_length(), 1008);
        assert!(suite.array_alignment().is_optimal());
        assert_eq!(suite.vector_alignment().length_remainder, 8);
    }

    #[test]
    fn test_cases_order() {
        let suite = Suite::<LINES>::new(LENGTH, &small_config())
            .unwrap()
            .with_kernels(KernelSet::from_isas([]));
        assert_eq!(suite.cases(), vec![Case::Vector, Case::Array, Case::Span]);

        let all = Suite::<LINES>::new(LENGTH, &small_config()).unwrap();
        let cases = all.cases();
        assert_eq!(&cases[..3], &[Case::Vector, Case::Array, Case::Span]);
        assert_eq!(cases.len(), 3 + KernelSet::compiled().wide_variants().len());
    }

    #[test]
    fn test_rows_agree() {
        let suite = Suite::<LINES>::new(LENGTH, &small_config()).unwrap();
        let mut seen = 0;
        let rows = suite.run_all(|_| seen += 1);
        assert_eq!(seen, rows.len());

        let reference = rows[0].outcome.as_ref().unwrap().result;
        for row in &rows {
            let report = row.outcome.as_ref().unwrap();
            assert_eq!(report.iterations, 3);
            let rel = ((report.result - reference) / reference).abs();
            assert!(rel < 1e-9, "{} differs: {} vs {}", row.case.label(), report.result, reference);
        }
    }

    #[test]
    fn test_missing_wide_kernel_row_fails_alone() {
        let suite = Suite::<LINES>::new(LENGTH, &small_config()).unwrap();
        // A wide ISA that is not compiled in reports an error instead of panicking.
        for isa in [Isa::Avx2, Isa::Avx512] {
            let row = suite.run_case(Case::Wide(isa));
            assert_eq!(row.outcome.is_ok(), isa.wide_kernel().is_some());
        }
    }

    #[test]
    fn test_length_bounds() {
        assert!(Suite::<1>::new(0, &small_config()).is_err());
        assert!(matches!(
            Suite::<1>::new(9, &small_config()),
            Err(Error::Capacity { required: 9, capacity: 8 })
        ));
    }

    #[test]
    fn test_case_labels() {
        assert_eq!(Case::Vector.label(), "Vector SIMD (auto)");
        assert_eq!(Case::Wide(Isa::Avx2).label(), "Array  AVX2");
        assert_eq!(Case::Span.isa(), Isa::Scalar);
    }
}
