use nw_aligner::{
    AlignConfig, Aligner, AlignerError, GapModel, Move, ScoreParams, Sequence, TieBreak,
    TracebackOperation,
};

const MODELS: [GapModel; 2] = [GapModel::ThreeMatrix, GapModel::NeighborState];

fn aligner(gap_model: GapModel) -> Aligner {
    Aligner::new(AlignConfig::new().with_gap_model(gap_model))
}

#[test]
fn ac_against_ag() {
    for gap_model in MODELS {
        let result = aligner(gap_model).align_str("AC", "AG").unwrap();
        assert_eq!(result.score, 10);
        assert_eq!(result.trace.aligned_a, "AC");
        assert_eq!(result.trace.markers, "| ");
        assert_eq!(result.trace.aligned_b, "AG");
        assert_eq!(
            result.trace.operations,
            [TracebackOperation::Match, TracebackOperation::Mismatch]
        );
    }
}

#[test]
fn identical_sequences() {
    for gap_model in MODELS {
        let result = aligner(gap_model).align_str("GATTACA", "GATTACA").unwrap();
        assert_eq!(result.score, 7 * 20);
        assert_eq!(result.trace.markers, "|||||||");
        assert!(!result.trace.aligned_a.contains('-'));
        assert!(!result.trace.aligned_b.contains('-'));
        assert_eq!(result.statistics.identity(), 1.0);
    }
}

#[test]
fn tie_break_order_selects_path() {
    let order = TieBreak::new([Move::Horizontal, Move::Vertical, Move::Diagonal]).unwrap();
    for gap_model in MODELS {
        let config = AlignConfig::new()
            .with_gap_model(gap_model)
            .with_tie_break(order);
        let result = Aligner::new(config).align_str("AC", "AG").unwrap();
        // Same optimum as the default order, reached through two gaps.
        assert_eq!(result.score, 10);
        assert_eq!(result.trace.to_string(), "A-C\n|  \nAG-");
        assert_eq!(result.statistics.gap_opens, 2);
    }
}

#[test]
fn gap_models_can_disagree() {
    // A long gap is cheap to extend but expensive to open.
    let params = ScoreParams::new(10, -20, -15, -1);
    let (a, b) = ("ACGTTTAC", "ACGAC");
    let three = Aligner::new(AlignConfig::new().with_scoring(params))
        .align_str(a, b)
        .unwrap();
    let neighbor = Aligner::new(
        AlignConfig::new()
            .with_scoring(params)
            .with_gap_model(GapModel::NeighborState),
    )
    .align_str(a, b)
    .unwrap();

    assert_eq!(three.score, 50 - 15 - 2);
    assert!(neighbor.score <= three.score);
}

#[test]
fn linear_gaps_match_classic_needleman_wunsch() {
    // Equal open and extend costs reduce both models to the linear case.
    let params = ScoreParams::new(1, -1, -1, -1);
    for gap_model in MODELS {
        let config = AlignConfig::new()
            .with_scoring(params)
            .with_gap_model(gap_model);
        let result = Aligner::new(config).align_str("GATTACA", "GCATGCU").unwrap();
        assert_eq!(result.score, 0);
    }
}

#[test]
fn malformed_sequences_rejected() {
    let err = aligner(GapModel::ThreeMatrix)
        .align_str("AC-GT", "ACGT")
        .unwrap_err();
    assert!(matches!(err, AlignerError::InvalidInput(_)));
    assert!(Sequence::try_from("ACGT\t").is_err());
}

#[test]
fn both_empty_rejected() {
    for gap_model in MODELS {
        let err = aligner(gap_model).align_str("", "").unwrap_err();
        assert!(matches!(err, AlignerError::InvalidInput(_)));
    }
}

#[test]
fn retained_matrix_has_sequence_dimensions() {
    for gap_model in MODELS {
        let result = aligner(gap_model).align_str("ACGTA", "CGT").unwrap();
        assert_eq!(result.score_matrix.dims(), (4, 6));
        assert_eq!(result.score_matrix.get(0, 0), 0);
        assert_eq!(result.score_matrix.final_score(), result.score);
    }
}
