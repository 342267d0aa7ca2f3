use crate::input_path::{InputPathLattice, LatticeError, PathId};
use crate::phrase::Sentence;
use crate::scores::ScoreBreakdown;
use crate::settings::settings;
use crate::span::Span;
use crate::testutil::test_sentence;

#[test]
fn test_build_covers_every_span() {
    let sentence = test_sentence();
    let lattice = InputPathLattice::build(&sentence, 4);
    // 4 + 3 + 2 + 1 spans
    assert_eq!(lattice.len(), 10);
    for len in 1..=4 {
        assert_eq!(lattice.paths_by_length(len).count(), 4 - len + 1);
    }
    let whole = lattice
        .path(lattice.get(Span::new(0, 3).unwrap()).unwrap())
        .unwrap();
    assert_eq!(whole.phrase().to_string(), "das haus ist klein");
}

#[test]
fn test_build_respects_max_span_length() {
    let sentence = test_sentence();
    let lattice = InputPathLattice::build(&sentence, 2);
    assert_eq!(lattice.len(), 7);
    assert!(lattice.get(Span::new(0, 2).unwrap()).is_none());
}

#[test]
fn test_build_is_ordered_by_length() {
    let sentence = test_sentence();
    let lattice = InputPathLattice::build(&sentence, 4);
    let lengths: Vec<usize> = lattice.iter().map(|p| p.span().len()).collect();
    let mut sorted = lengths.clone();
    sorted.sort();
    assert_eq!(lengths, sorted);
}

#[test]
fn test_predecessor_chain() {
    let sentence = test_sentence();
    let lattice = InputPathLattice::build(&sentence, 4);
    let id = lattice.get(Span::new(1, 3).unwrap()).unwrap();
    let chain: Vec<String> = lattice
        .predecessor_chain(id)
        .map(|p| p.span().to_string())
        .collect();
    assert_eq!(chain, vec!["[1..3]", "[1..2]", "[1..1]"]);
    for path in lattice.iter() {
        if let Some(prev) = path.predecessor() {
            let prev = lattice.path(prev).unwrap();
            assert!(prev.span().len() < path.span().len());
            assert!(prev.span().is_prefix_of(&path.span()));
            assert!(prev.id() < path.id());
        }
    }
}

#[test]
fn test_build_default_uses_settings() {
    let sentence = Sentence::new(2, "a b c d e f g h i j k l");
    let lattice = InputPathLattice::build_default(&sentence);
    let max = settings().lattice.max_span_length;
    assert!(lattice.iter().all(|p| p.span().len() <= max));
    assert_eq!(lattice.paths_by_length(max).count(), sentence.len() - max + 1);
}

#[test]
fn test_empty_sentence() {
    let sentence = Sentence::new(0, "");
    let lattice = InputPathLattice::build(&sentence, 5);
    assert!(lattice.is_empty());
}

#[test]
fn test_add_path_rejects_predecessor_not_shorter() {
    let sentence = test_sentence();
    let mut lattice = InputPathLattice::new(&sentence);
    let a = lattice.add_path(Span::new(0, 1).unwrap(), None, None).unwrap();
    let err = lattice
        .add_path(Span::new(0, 1).unwrap(), Some(a), None)
        .unwrap_err();
    assert!(matches!(err, LatticeError::PredecessorNotShorter { .. }));
}

#[test]
fn test_add_path_rejects_bad_predecessors() {
    let sentence = test_sentence();
    let mut lattice = InputPathLattice::new(&sentence);
    let a = lattice.add_path(Span::single(3), None, None).unwrap();

    let err = lattice
        .add_path(Span::new(0, 1).unwrap(), Some(a), None)
        .unwrap_err();
    assert!(matches!(err, LatticeError::PredecessorOutside { .. }));

    let err = lattice
        .add_path(Span::new(0, 1).unwrap(), Some(PathId(99)), None)
        .unwrap_err();
    assert_eq!(err, LatticeError::UnknownPredecessor(PathId(99)));
}

#[test]
fn test_add_path_rejects_interior_predecessor() {
    let sentence = test_sentence();
    let mut lattice = InputPathLattice::new(&sentence);
    let middle = lattice.add_path(Span::single(1), None, None).unwrap();

    let err = lattice
        .add_path(Span::new(0, 2).unwrap(), Some(middle), None)
        .unwrap_err();
    assert_eq!(
        err,
        LatticeError::PredecessorOutside {
            span: Span::new(0, 2).unwrap(),
            predecessor: Span::single(1),
        }
    );
    assert_eq!(lattice.len(), 1);
}

#[test]
fn test_add_path_accepts_prefix_and_suffix_predecessors() {
    let sentence = test_sentence();
    let mut lattice = InputPathLattice::new(&sentence);
    let first = lattice.add_path(Span::single(0), None, None).unwrap();
    let last = lattice.add_path(Span::single(2), None, None).unwrap();

    let prefixed = lattice
        .add_path(Span::new(0, 2).unwrap(), Some(first), None)
        .unwrap();
    let suffixed = lattice
        .add_path(Span::new(0, 2).unwrap(), Some(last), None)
        .unwrap();
    assert_eq!(
        lattice.paths_for_span(Span::new(0, 2).unwrap()),
        &[prefixed, suffixed]
    );
}

#[test]
fn test_add_path_rejects_out_of_order_and_range() {
    let sentence = test_sentence();
    let mut lattice = InputPathLattice::new(&sentence);
    lattice.add_path(Span::new(0, 2).unwrap(), None, None).unwrap();

    let err = lattice.add_path(Span::single(0), None, None).unwrap_err();
    assert!(matches!(err, LatticeError::OutOfOrder { previous_len: 3, .. }));

    let err = lattice
        .add_path(Span::new(2, 4).unwrap(), None, None)
        .unwrap_err();
    assert!(matches!(err, LatticeError::OutOfRange { len: 4, .. }));
    assert_eq!(lattice.len(), 1);
}

#[test]
fn test_pop_releases_score_and_keeps_chain() {
    let sentence = test_sentence();
    let mut score = ScoreBreakdown::new();
    score.plus_equals_sparse(&crate::ff::FeatureDescriptor::new("Input", 0), "conf", 0.9);
    let mut lattice = InputPathLattice::build_with_scores(&sentence, 3, |span| {
        (span.len() == 3).then(|| score.clone())
    });

    let last = lattice.pop().unwrap();
    assert_eq!(last.span(), Span::new(1, 3).unwrap());
    assert_eq!(last.into_input_score(), Some(score.clone()));
    assert!(lattice.get(Span::new(1, 3).unwrap()).is_none());

    // The sibling [0..2] still walks its full chain.
    let id = lattice.get(Span::new(0, 2).unwrap()).unwrap();
    assert_eq!(lattice.path(id).unwrap().input_score(), Some(&score));
    assert_eq!(lattice.predecessor_chain(id).count(), 3);
    assert_eq!(lattice.len(), 8);
}
