//! Synthesis diagnostics: timing and counts for each stage.
//!
//! Permanent instrumentation for scenario tuning -- every call to
//! [`synthesize`](crate::synthesize) collects these alongside its
//! result. Durations are serialized as fractional seconds (`f64`) for
//! JSON compatibility, since `std::time::Duration` does not implement
//! serde traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single synthesis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisDiagnostics {
    /// Stage 1: unreachable-terminal detection.
    pub reachability: StageDiagnostics,
    /// Stage 2: all-pairs shortest paths with corridor decay.
    pub pathfinding: StageDiagnostics,
    /// Stage 3: Delaunay pair selection.
    pub pair_selection: StageDiagnostics,
    /// Stage 4: graph assembly and degree-2 reduction.
    pub reduction: StageDiagnostics,
    /// Stage 5: construction / right-of-way decomposition.
    pub decomposition: StageDiagnostics,
    /// Total wall-clock duration of the run (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts for the run.
    pub summary: SynthesisSummary,
}

/// Diagnostics for a single stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics that vary by synthesis stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Unreachable-terminal detection metrics.
    Reachability {
        /// Number of sources checked.
        sources_checked: usize,
        /// Number of sinks checked.
        sinks_checked: usize,
    },
    /// Shortest-path catalog metrics.
    Pathfinding {
        /// Number of terminals routed between.
        terminal_count: usize,
        /// Number of paths in the catalog.
        path_count: usize,
        /// Total cells across all catalog routes.
        total_route_cells: usize,
    },
    /// Delaunay pair selection metrics.
    PairSelection {
        /// Distinct terminal positions triangulated.
        point_count: usize,
        /// Pairs selected.
        pair_count: usize,
    },
    /// Graph assembly and degree-2 reduction metrics.
    Reduction {
        /// Vertices before reduction.
        vertices_before: usize,
        /// Edges before reduction.
        edges_before: usize,
        /// Vertices merged away.
        vertices_removed: usize,
        /// Merge attempts skipped to avoid a parallel edge.
        merges_blocked: usize,
        /// Vertices surviving reduction.
        vertices_after: usize,
        /// Edges surviving reduction.
        edges_after: usize,
    },
    /// Cost decomposition metrics.
    Decomposition {
        /// Edges decomposed.
        edge_count: usize,
    },
}

/// High-level summary counts for the entire run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisSummary {
    /// Grid width in cells.
    pub grid_width: u32,
    /// Grid height in cells.
    pub grid_height: u32,
    /// Number of sources.
    pub source_count: usize,
    /// Number of sinks.
    pub sink_count: usize,
    /// Vertices in the final candidate network.
    pub vertex_count: usize,
    /// Edges in the final candidate network.
    pub edge_count: usize,
    /// Connected components in the final candidate network.
    pub connected_components: usize,
}

impl SynthesisDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Synthesis Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Grid: {}x{}  |  {} source(s), {} sink(s)",
            self.summary.grid_width,
            self.summary.grid_height,
            self.summary.source_count,
            self.summary.sink_count,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<20} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);
        let stages: [(&str, &StageDiagnostics); 5] = [
            ("Reachability", &self.reachability),
            ("Pathfinding", &self.pathfinding),
            ("Pair Selection", &self.pair_selection),
            ("Reduction", &self.reduction),
            ("Decomposition", &self.decomposition),
        ];
        for (name, stage) in stages {
            let ms = duration_ms(stage.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&stage.metrics);
            lines.push(format!("{name:<20} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Network: {} vertices, {} edges, {} component(s)",
            self.summary.vertex_count,
            self.summary.edge_count,
            self.summary.connected_components,
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Reachability {
            sources_checked,
            sinks_checked,
        } => format!("{sources_checked} sources, {sinks_checked} sinks"),
        StageMetrics::Pathfinding {
            terminal_count,
            path_count,
            total_route_cells,
        } => format!(
            "{terminal_count} terminals -> {path_count} paths ({total_route_cells} cells)",
        ),
        StageMetrics::PairSelection {
            point_count,
            pair_count,
        } => format!("{point_count} points -> {pair_count} pairs"),
        StageMetrics::Reduction {
            vertices_before,
            edges_before,
            vertices_removed,
            merges_blocked,
            vertices_after,
            edges_after,
        } => format!(
            "{vertices_before}v/{edges_before}e -> {vertices_after}v/{edges_after}e (removed={vertices_removed} blocked={merges_blocked})",
        ),
        StageMetrics::Decomposition { edge_count } => format!("{edge_count} edges"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn zero_stage(metrics: StageMetrics) -> StageDiagnostics {
        StageDiagnostics {
            duration: Duration::ZERO,
            metrics,
        }
    }

    fn sample() -> SynthesisDiagnostics {
        SynthesisDiagnostics {
            reachability: zero_stage(StageMetrics::Reachability {
                sources_checked: 2,
                sinks_checked: 1,
            }),
            pathfinding: StageDiagnostics {
                duration: Duration::from_millis(12),
                metrics: StageMetrics::Pathfinding {
                    terminal_count: 3,
                    path_count: 3,
                    total_route_cells: 17,
                },
            },
            pair_selection: zero_stage(StageMetrics::PairSelection {
                point_count: 3,
                pair_count: 3,
            }),
            reduction: zero_stage(StageMetrics::Reduction {
                vertices_before: 12,
                edges_before: 14,
                vertices_removed: 8,
                merges_blocked: 1,
                vertices_after: 4,
                edges_after: 5,
            }),
            decomposition: zero_stage(StageMetrics::Decomposition { edge_count: 5 }),
            total_duration: Duration::from_millis(15),
            summary: SynthesisSummary {
                grid_width: 10,
                grid_height: 8,
                source_count: 2,
                sink_count: 1,
                vertex_count: 4,
                edge_count: 5,
                connected_components: 1,
            },
        }
    }

    #[test]
    fn duration_ms_converts_correctly() {
        let ms = duration_ms(Duration::from_millis(1234));
        assert!((ms - 1234.0).abs() < 0.01);
    }

    #[test]
    fn report_mentions_every_stage() {
        let report = sample().report();
        assert!(report.contains("Synthesis Diagnostics Report"));
        assert!(report.contains("Reachability"));
        assert!(report.contains("Pathfinding"));
        assert!(report.contains("Pair Selection"));
        assert!(report.contains("Reduction"));
        assert!(report.contains("Decomposition"));
        assert!(report.contains("4 vertices, 5 edges, 1 component(s)"));
    }

    #[test]
    fn serde_round_trip_preserves_durations_as_seconds() {
        let diag = sample();
        let json = serde_json::to_string(&diag).unwrap();
        // Durations serialize as fractional seconds.
        assert!(json.contains("\"total_duration\":0.015"));
        let back: SynthesisDiagnostics = serde_json::from_str(&json).unwrap();
        assert_eq!(back.total_duration, Duration::from_millis(15));
        assert_eq!(back.summary.vertex_count, 4);
    }

    #[test]
    fn negative_duration_is_rejected_on_deserialize() {
        let json = r#"{"duration":-1.0,"metrics":{"Decomposition":{"edge_count":0}}}"#;
        let result: Result<StageDiagnostics, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
