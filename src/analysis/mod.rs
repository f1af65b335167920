/// Analysis layer: the question catalog and the per-question pipeline.
///
/// Architecture:
/// ```text
///   IndicatorTable + FilterSelection
///        │
///        ▼
///   ┌──────────┐
///   │ registry  │  question id → Question { View, labels }
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ transform  │  sum / mean by year, top-N, latest-year slice
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  chart    │  titles, axis labels, series → ChartSpec
///   └──────────┘
/// ```
/// [`pipeline::render`] runs all three.

pub mod chart;
pub mod pipeline;
pub mod registry;
pub mod transform;
