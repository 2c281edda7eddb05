// Copyright 2025 AgentReplay (https://github.com/agentreplay)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Integration tests for context assembly.

use std::sync::Arc;

use agentreplay_context::{
    estimate_tokens, AssemblyResult, Candidates, CompactOptions, ContextAssembler, ContextConfig,
    Observation, ObservationId, ObservationType, RenderMode, SessionSummary, TokenBudget,
};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn assembler() -> ContextAssembler {
    ContextAssembler::new(ContextConfig::default()).unwrap()
}

/// Observation whose compact line plus newline costs exactly `tokens`.
fn observation_costing(id: &str, tokens: usize) -> Observation {
    Observation::builder("session-1", "agentreplay")
        .id(id)
        .observation_type(ObservationType::Discovery)
        .title("t".repeat(tokens * 4 - 13))
        .build()
}

fn ids(result: &AssemblyResult) -> Vec<&str> {
    result.included_ids.iter().map(|id| id.0.as_str()).collect()
}

/// Summary completed slot of 160 characters is cut to 147 plus an ellipsis.
#[test]
fn test_summary_done_truncation() {
    init_tracing();
    let summary = SessionSummary::builder("session-1", "agentreplay")
        .completed("d".repeat(160))
        .build();
    let result = assembler().assemble(&Candidates::new(&[]).with_summary(&summary), TokenBudget::new(1000));

    assert!(result.summary_included);
    assert_eq!(
        result.text,
        format!("## Summary\nDone: {}...", "d".repeat(147))
    );
}

/// Five ~40 token observations against a budget of 100: two fit, and the
/// loop stops at the third even though the fourth and fifth are small.
#[test]
fn test_first_fit_then_stop() {
    init_tracing();
    let observations = vec![
        observation_costing("o1", 40),
        observation_costing("o2", 40),
        observation_costing("o3", 40),
        observation_costing("o4", 4),
        observation_costing("o5", 4),
    ];
    let result = assembler().assemble(&Candidates::new(&observations), TokenBudget::new(100));

    assert_eq!(ids(&result), vec!["o1", "o2"]);
    assert_eq!(result.observations_offered, 5);
    assert_eq!(result.tokens_used, 84);
    assert!(result.truncated);
}

/// A zero budget drops the summary and leaves only the bare heading.
#[test]
fn test_zero_budget_bare_heading() {
    init_tracing();
    let summary = SessionSummary::builder("session-1", "agentreplay")
        .completed("Shipped")
        .learned("Budgets are soft at the margins")
        .build();
    let observations = vec![observation_costing("o1", 5)];
    let result = assembler().assemble(
        &Candidates::new(&observations).with_summary(&summary),
        TokenBudget::new(0),
    );

    assert!(!result.summary_included);
    assert_eq!(result.observations_included, 0);
    assert_eq!(result.text, "## Observations");
    assert_eq!(result.tokens_used, assembler().heading_cost());
}

/// The observations heading is charged 4 tokens by the default estimator.
#[test]
fn test_heading_cost_constant() {
    assert_eq!(assembler().heading_cost(), 4);
    assert_eq!(estimate_tokens("## Observations\n"), 4);
}

#[test]
fn test_negative_budget_fails_at_boundary() {
    let observations = vec![observation_costing("o1", 5)];
    let err = assembler()
        .try_assemble(&Candidates::new(&observations), RenderMode::Compact, -1)
        .unwrap_err();
    assert_eq!(err.to_string(), "Token budget must not be negative, got -1");
}

#[test]
fn test_full_verbose_document() {
    init_tracing();
    let ts = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let summary = SessionSummary::builder("session-1", "agentreplay")
        .request("Speed up trace ingestion")
        .completed("Batched writes")
        .created_at(ts)
        .build();
    let observations = vec![Observation::builder("session-1", "agentreplay")
        .id("obs-1")
        .observation_type(ObservationType::Implementation)
        .title("Batch LSM writes")
        .narrative("Writes are grouped into 64-entry batches.")
        .add_fact("64 entries per batch")
        .add_file_modified("agentreplay-storage/src/lsm.rs")
        .prompt_number(2)
        .created_at(ts)
        .build()];

    let result = assembler().assemble_with_mode(
        &Candidates::new(&observations).with_summary(&summary),
        RenderMode::Verbose,
        TokenBudget::new(2000),
    );

    let expected = "## Summary\n\
        #### Request\nSpeed up trace ingestion\n\n\
        #### Completed\nBatched writes\n\n\
        ## Observations\n\
        ### [IMPLEMENTATION] Batch LSM writes\n\n\
        Writes are grouped into 64-entry batches.\n\n\
        **Facts:**\n- 64 entries per batch\n\
        **Files modified:**\n- agentreplay-storage/src/lsm.rs\n\n\
        _Project: agentreplay · Type: implementation · Seq: 2 · 2025-06-01 12:00:00 UTC_";
    assert_eq!(result.text, expected);
    assert!(!result.truncated);
}

#[test]
fn test_string_encoded_lists_from_store() {
    let row = serde_json::json!({
        "id": "obs-42",
        "session_id": "session-9",
        "type": "learning",
        "title": "Cache invalidation order",
        "narrative": null,
        "facts": "[\"invalidate before write\", \"never after\"]",
        "concepts": "[\"caching\"]",
        "files_read": "{broken",
        "files_modified": [],
        "project": "agentreplay",
        "prompt_number": 7,
        "created_at": "2025-02-02T10:00:00Z",
        "discovery_tokens": 1200
    });
    let obs: Observation = serde_json::from_value(row).unwrap();
    let observations = vec![obs];

    let config = ContextConfig::default()
        .with_compact(CompactOptions::default().segments(true, true, true));
    let assembler = ContextAssembler::new(config).unwrap();
    let result = assembler.assemble(&Candidates::new(&observations), TokenBudget::new(500));

    assert_eq!(
        result.text,
        "## Observations\n[LEARNING] Cache invalidation order | \
         Facts: invalidate before write; never after | [caching]"
    );
}

#[test]
fn test_shared_across_threads() {
    init_tracing();
    let assembler = Arc::new(assembler());
    let observations: Vec<Observation> = (0..20)
        .map(|i| observation_costing(&format!("o{}", i), 10 + i))
        .collect();
    let expected = assembler.assemble(&Candidates::new(&observations), TokenBudget::new(150));

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let assembler = Arc::clone(&assembler);
                let observations = &observations;
                scope.spawn(move || {
                    assembler.assemble(&Candidates::new(observations), TokenBudget::new(150))
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

fn arb_observation() -> impl Strategy<Value = Observation> {
    (
        prop::sample::select(ObservationType::ALL.to_vec()),
        "[A-Za-z ]{1,60}",
        prop::option::of("\\PC{0,300}"),
        prop::collection::vec("[a-z ]{1,30}", 0..6),
        prop::collection::vec("[a-z-]{1,15}", 0..4),
        prop::collection::vec("src/[a-z]{1,10}\\.rs", 0..3),
    )
        .prop_map(|(kind, title, narrative, facts, concepts, files)| {
            let mut builder = Observation::builder("session-1", "agentreplay")
                .observation_type(kind)
                .title(title)
                .facts(facts)
                .concepts(concepts);
            if let Some(narrative) = narrative {
                builder = builder.narrative(narrative);
            }
            for file in files {
                builder = builder.add_file_modified(file);
            }
            builder.build()
        })
}

fn arb_observations() -> impl Strategy<Value = Vec<Observation>> {
    prop::collection::vec(arb_observation(), 0..12).prop_map(|mut observations| {
        for (i, obs) in observations.iter_mut().enumerate() {
            obs.id = ObservationId::from_string(format!("obs-{}", i));
        }
        observations
    })
}

fn arb_summary() -> impl Strategy<Value = SessionSummary> {
    (
        prop::option::of("[a-z ]{0,200}"),
        prop::option::of("[a-z ]{0,200}"),
        prop::option::of("[a-z ]{0,200}"),
    )
        .prop_map(|(completed, learned, next_steps)| {
            let mut builder = SessionSummary::builder("session-1", "agentreplay");
            if let Some(c) = completed {
                builder = builder.completed(c);
            }
            if let Some(l) = learned {
                builder = builder.learned(l);
            }
            if let Some(n) = next_steps {
                builder = builder.next_steps(n);
            }
            builder.build()
        })
}

fn arb_mode() -> impl Strategy<Value = RenderMode> {
    prop_oneof![Just(RenderMode::Compact), Just(RenderMode::Verbose)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Tokens used stay within the budget plus the unconditional heading cost.
    #[test]
    fn prop_budget_respected(
        observations in arb_observations(),
        summary in prop::option::of(arb_summary()),
        mode in arb_mode(),
        budget in 0usize..2000,
    ) {
        let assembler = assembler();
        let mut candidates = Candidates::new(&observations);
        if let Some(summary) = &summary {
            candidates = candidates.with_summary(summary);
        }
        let result = assembler.assemble_with_mode(&candidates, mode, TokenBudget::new(budget));

        prop_assert!(result.tokens_used <= budget + assembler.heading_cost());
        if observations.is_empty() {
            prop_assert!(result.tokens_used <= budget);
        }
    }

    /// Included observations are always a prefix of the offered sequence.
    #[test]
    fn prop_included_is_prefix(
        observations in arb_observations(),
        mode in arb_mode(),
        budget in 0usize..2000,
    ) {
        let result = assembler().assemble_with_mode(
            &Candidates::new(&observations),
            mode,
            TokenBudget::new(budget),
        );

        let n = result.observations_included;
        let expected: Vec<ObservationId> =
            observations.iter().take(n).map(|o| o.id.clone()).collect();
        prop_assert_eq!(&result.included_ids, &expected);
        prop_assert_eq!(result.truncated, n < observations.len());
    }

    /// Raising the budget never lowers the number of included observations.
    #[test]
    fn prop_monotonic_in_budget(
        observations in arb_observations(),
        mode in arb_mode(),
        a in 0usize..2000,
        b in 0usize..2000,
    ) {
        let (lo, hi) = (a.min(b), a.max(b));
        let assembler = assembler();
        let candidates = Candidates::new(&observations);

        let low = assembler.assemble_with_mode(&candidates, mode, TokenBudget::new(lo));
        let high = assembler.assemble_with_mode(&candidates, mode, TokenBudget::new(hi));
        prop_assert!(low.observations_included <= high.observations_included);
    }

    /// Compact rendering is a pure function of its input.
    #[test]
    fn prop_compact_rendering_idempotent(obs in arb_observation()) {
        let assembler = assembler();
        let renderer = assembler.renderer();
        let first = renderer.render_observation(&obs, RenderMode::Compact);
        let second = renderer.render_observation(&obs, RenderMode::Compact);
        prop_assert_eq!(first, second);
    }

    /// The estimate is ceil(chars / 4) for any text.
    #[test]
    fn prop_estimate_is_char_ratio(text in "\\PC{0,200}") {
        prop_assert_eq!(estimate_tokens(&text), text.chars().count().div_ceil(4));
    }
}
