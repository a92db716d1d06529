//! Engine tests.
//!
//! These drive whole element trees through the render-pass entry points and
//! the persistent state tree, checking the properties the caches rely on:
//! measurement is monotonic, caching never changes an answer, identity
//! survives updates, and rounding keeps shared edges shared.

use core::cell::{Cell, RefCell};
use std::rc::Rc;

use proptest::prelude::*;

use crate::{
    AnyElement, Axis, Column, EdgeInsets, Element, ElementContent, ElementIdentifier, ElementKey,
    ElementStateTree, ElementType, Environment, EnvironmentKey, EquivalencyContext, Inset,
    LayoutOptions, LayoutResultNode, Point, Rect, RoundingScale, Row, Size, SizeConstraint,
    Spacer, StackTraits, StateId, StateTreeObserver,
    adapted::AdaptedEnvironment,
    cache::{HintingSizeCache, layout_element, measure_element},
    stack::{CrossAlignment, OverflowDistribution, UnderflowDistribution},
    state::{CacheOutcome, InvalidationReason},
};

// ============================================================================
// Test Infrastructure
// ============================================================================

/// Glyph scale read by [`Text`] while measuring.
enum FontScale {}

impl EnvironmentKey for FontScale {
    type Value = f32;

    fn default_value() -> f32 {
        1.0
    }
}

/// Set by the tests but never read by any element.
enum Accent {}

impl EnvironmentKey for Accent {
    type Value = u32;

    fn default_value() -> u32 {
        0
    }

    fn is_equivalent(lhs: &u32, rhs: &u32, context: EquivalencyContext) -> bool {
        context == EquivalencyContext::Sizing || lhs == rhs
    }
}

/// Feeds [`FontScale`] through an adapter.
enum BaseScale {}

impl EnvironmentKey for BaseScale {
    type Value = f32;

    fn default_value() -> f32 {
        1.0
    }
}

/// Wrapping text: 10pt glyphs (times the font scale) on 20pt lines.
/// Counts how often it is measured.
#[derive(Debug, Clone)]
struct Text {
    characters: u16,
    calls: Rc<Cell<usize>>,
}

impl Text {
    fn new(characters: u16) -> Self {
        Self::counted(characters, &Rc::new(Cell::new(0)))
    }

    fn counted(characters: u16, calls: &Rc<Cell<usize>>) -> Self {
        Self {
            characters,
            calls: calls.clone(),
        }
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.characters == other.characters && Rc::ptr_eq(&self.calls, &other.calls)
    }
}

impl Element for Text {
    fn content(&self) -> ElementContent {
        let calls = self.calls.clone();
        let characters = f32::from(self.characters);
        ElementContent::measure(move |constraint, environment| {
            calls.set(calls.get() + 1);
            let glyph = 10.0 * environment.get::<FontScale>();
            let per_line = (constraint.width.maximum() / glyph).floor().max(1.0);
            let lines = (characters / per_line).ceil().max(1.0);
            Size::new(characters.min(per_line) * glyph, lines * 20.0)
        })
    }

    fn is_equivalent(&self, other: &dyn Element) -> bool {
        crate::equivalent_by_value(self, other)
    }
}

/// Records observer callbacks as strings.
#[derive(Debug, Default)]
struct Recorder {
    events: RefCell<Vec<String>>,
}

impl Recorder {
    fn take(&self) -> Vec<String> {
        self.events.take()
    }

    fn count(&self, prefix: &str) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| event.starts_with(prefix))
            .count()
    }

    fn push(&self, event: String) {
        self.events.borrow_mut().push(event);
    }
}

impl StateTreeObserver for Recorder {
    fn did_set_up_root(&self, _: StateId, identifier: &ElementIdentifier) {
        self.push(format!("set up {identifier}"));
    }

    fn did_update_root(&self, _: StateId, identifier: &ElementIdentifier) {
        self.push(format!("update {identifier}"));
    }

    fn did_replace_root(&self, _: StateId, _: StateId, identifier: &ElementIdentifier) {
        self.push(format!("replace {identifier}"));
    }

    fn did_tear_down_root(&self, _: StateId) {
        self.push("tear down".to_string());
    }

    fn did_create_state(&self, _: StateId, identifier: &ElementIdentifier) {
        self.push(format!("create {identifier}"));
    }

    fn did_remove_state(&self, _: StateId, identifier: &ElementIdentifier) {
        self.push(format!("remove {identifier}"));
    }

    fn did_invalidate_state(&self, _: StateId, reason: InvalidationReason) {
        self.push(format!("invalidate {reason:?}"));
    }

    fn did_measure(&self, _: StateId, _: SizeConstraint, _: Size, outcome: CacheOutcome) {
        self.push(format!("measure {outcome:?}"));
    }

    fn did_layout(&self, _: StateId, _: Size, outcome: CacheOutcome) {
        self.push(format!("layout {outcome:?}"));
    }
}

fn keyed<T: 'static>(key: &str) -> ElementIdentifier {
    ElementIdentifier::new(ElementType::of::<T>(), Some(ElementKey::from(key)), 0)
}

fn unkeyed<T: 'static>(count: usize) -> ElementIdentifier {
    ElementIdentifier::new(ElementType::of::<T>(), None, count)
}

fn constraint(width: Option<u16>, height: Option<u16>) -> SizeConstraint {
    let axis = |value: Option<u16>| value.map_or(Axis::Unconstrained, |value| Axis::at_most(f32::from(value)));
    SizeConstraint::new(axis(width), axis(height))
}

fn spans(node: &LayoutResultNode) -> Vec<(f32, f32)> {
    node.children
        .iter()
        .map(|child| (child.frame().min_x(), child.frame().max_x()))
        .collect()
}

fn paragraph(lengths: &[u16]) -> Column {
    lengths
        .iter()
        .fold(Column::new(), |column, length| column.child(Text::new(*length)))
}

// ============================================================================
// Stack distribution through the engine
// ============================================================================

#[test]
fn row_grows_uniformly_into_slack() {
    let row = Row::new()
        .underflow(UnderflowDistribution::GrowUniformly)
        .child(Spacer::new(Size::new(200.0, 20.0)))
        .child(Spacer::new(Size::new(100.0, 20.0)));

    let mut tree = ElementStateTree::default();
    tree.update(row, &Environment::new());
    let node = tree
        .layout(Rect::from_size(Size::new(400.0, 20.0)))
        .expect("tree has a root");

    assert_eq!(spans(&node), [(0.0, 250.0), (250.0, 400.0)]);
}

#[test]
fn row_condenses_proportionally_into_shortfall() {
    let row = Row::new()
        .overflow(OverflowDistribution::CondenseProportionally)
        .child(Spacer::new(Size::new(300.0, 20.0)))
        .child(Spacer::new(Size::new(100.0, 20.0)));

    let node = layout_element(
        row,
        Rect::from_size(Size::new(200.0, 20.0)),
        &Environment::new(),
        LayoutOptions::default(),
    );

    assert_eq!(spans(&node), [(0.0, 150.0), (150.0, 200.0)]);
}

#[test]
fn fixed_children_overflow_instead_of_shrinking() {
    let row = Row::new()
        .child_with(Spacer::width(150.0), StackTraits::FIXED)
        .child_with(Spacer::width(100.0), StackTraits::FIXED);

    let node = layout_element(
        row,
        Rect::from_size(Size::new(200.0, 20.0)),
        &Environment::new(),
        LayoutOptions::default(),
    );

    assert_eq!(spans(&node), [(0.0, 150.0), (150.0, 250.0)]);
}

#[test]
fn empty_containers_measure_to_zero() {
    for options in [LayoutOptions::empty(), LayoutOptions::all()] {
        let size = measure_element(
            Row::new(),
            SizeConstraint::UNCONSTRAINED,
            &Environment::new(),
            options,
        );
        assert_eq!(size, Size::zero());
    }
}

// ============================================================================
// Identity
// ============================================================================

fn keyed_column(keys: &[&str]) -> Column {
    keys.iter().fold(Column::new(), |column, key| {
        column.keyed_child(*key, Spacer::uniform(10.0), StackTraits::default())
    })
}

#[test]
fn recurring_identifiers_keep_their_state() {
    let recorder = Rc::new(Recorder::default());
    let mut tree = ElementStateTree::default().with_observer(recorder.clone());
    let env = Environment::new();

    let root = tree.update(keyed_column(&["a", "b"]), &env);
    let a = tree.child(root, &keyed::<Spacer>("a")).expect("a exists");
    let b = tree.child(root, &keyed::<Spacer>("b")).expect("b exists");
    assert_eq!(tree.len(), 3);
    assert_eq!(recorder.count("create"), 3);
    recorder.take();

    assert_eq!(tree.update(keyed_column(&["a", "b"]), &env), root);
    assert_eq!(tree.child(root, &keyed::<Spacer>("a")), Some(a));
    assert_eq!(tree.child(root, &keyed::<Spacer>("b")), Some(b));
    assert_eq!(recorder.take(), ["update Column.0"]);

    tree.update(keyed_column(&["b", "c"]), &env);
    assert_eq!(tree.child(root, &keyed::<Spacer>("b")), Some(b));
    assert!(tree.state(a).is_none(), "a was torn down");
    let c = tree.child(root, &keyed::<Spacer>("c")).expect("c was created");
    assert_ne!(c, a);
    assert_eq!(tree.len(), 3);

    let events = recorder.take();
    assert!(events.contains(&r#"create Spacer."c".0"#.to_string()));
    assert!(events.contains(&r#"remove Spacer."a".0"#.to_string()));

    let order = tree.state(root).expect("root").children().to_vec();
    assert_eq!(order, [b, c]);
}

#[test]
fn changing_the_root_type_replaces_the_tree() {
    let recorder = Rc::new(Recorder::default());
    let mut tree = ElementStateTree::default().with_observer(recorder.clone());
    let env = Environment::new();

    let column = tree.update(keyed_column(&["a"]), &env);
    let row = tree.update(Row::new().child(Spacer::uniform(4.0)), &env);

    assert_ne!(column, row);
    assert!(tree.state(column).is_none());
    assert_eq!(tree.len(), 2);
    assert_eq!(recorder.count("replace Row.0"), 1);
    assert_eq!(recorder.count("remove"), 2);

    tree.teardown();
    assert!(tree.is_empty());
    assert_eq!(tree.root(), None);
    assert!(tree.layout(Rect::from_size(Size::new(10.0, 10.0))).is_none());
    assert_eq!(recorder.count("tear down"), 1);
}

#[test]
fn unkeyed_siblings_are_matched_by_position() {
    let mut tree = ElementStateTree::default();
    let env = Environment::new();

    let root = tree.update(paragraph(&[3, 5]), &env);
    let first = tree.child(root, &unkeyed::<Text>(0)).expect("first");
    let second = tree.child(root, &unkeyed::<Text>(1)).expect("second");

    tree.update(paragraph(&[5, 3]), &env);
    assert_eq!(tree.child(root, &unkeyed::<Text>(0)), Some(first));
    assert_eq!(tree.child(root, &unkeyed::<Text>(1)), Some(second));

    let state = tree.state(first).expect("first");
    let text = state.element().downcast_ref::<Text>().expect("a text");
    assert_eq!(text.characters, 5);
    assert_eq!(state.parent(), Some(root));
    assert_eq!(state.depth(), 1);
}

#[test]
#[should_panic(expected = "duplicate element identifier")]
fn duplicate_identifiers_are_rejected() {
    #[derive(Debug)]
    struct Twins;

    impl Element for Twins {
        fn content(&self) -> ElementContent {
            let twin = unkeyed::<Spacer>(0);
            let mut builder = crate::LayoutContent::builder(crate::overlay::OverlayLayout);
            builder
                .add_identified((), twin.clone(), Spacer::uniform(1.0))
                .add_identified((), twin, Spacer::uniform(2.0));
            builder.build().into()
        }
    }

    let mut tree = ElementStateTree::default();
    tree.update(Twins, &Environment::new());
}

// ============================================================================
// Cache retention and invalidation
// ============================================================================

#[test]
fn equivalent_updates_keep_measurements() {
    let calls = Rc::new(Cell::new(0));
    let build = |characters| Column::new().child(Text::counted(characters, &calls));
    let env = Environment::new();
    let query = SizeConstraint::width_at_most(100.0);

    let mut tree = ElementStateTree::default();
    tree.update(build(25), &env);
    assert_eq!(tree.measure(query), Some(Size::new(100.0, 60.0)));
    assert_eq!(calls.get(), 1);

    tree.update(build(25), &env);
    assert_eq!(tree.measure(query), Some(Size::new(100.0, 60.0)));
    assert_eq!(calls.get(), 1, "an equivalent tree is not re-measured");

    tree.update(build(5), &env);
    assert_eq!(tree.measure(query), Some(Size::new(50.0, 20.0)));
    assert_eq!(calls.get(), 2);
}

#[test]
fn environment_changes_invalidate_only_readers() {
    let calls = Rc::new(Cell::new(0));
    let build = || Column::new().child(Text::counted(4, &calls));
    let recorder = Rc::new(Recorder::default());
    let mut tree = ElementStateTree::default().with_observer(recorder.clone());
    let query = SizeConstraint::UNCONSTRAINED;

    let env = Environment::new().with::<FontScale>(1.0);
    tree.update(build(), &env);
    assert_eq!(tree.measure(query), Some(Size::new(40.0, 20.0)));
    assert_eq!(calls.get(), 1);

    // Accent is never read, so nothing is invalidated.
    tree.update(build(), &env.clone().with::<Accent>(7));
    assert_eq!(tree.measure(query), Some(Size::new(40.0, 20.0)));
    assert_eq!(calls.get(), 1);
    assert_eq!(recorder.count("invalidate"), 0);

    // FontScale was read by the text, and so by the column measuring it.
    tree.update(build(), &env.clone().with::<FontScale>(2.0));
    assert_eq!(tree.measure(query), Some(Size::new(80.0, 20.0)));
    assert_eq!(calls.get(), 2);
    assert_eq!(recorder.count("invalidate EnvironmentChanged"), 2);

    let root = tree.root().expect("root");
    assert!(tree.state(root).expect("root").dependencies().contains::<FontScale>());
}

#[test]
fn adapter_reads_invalidate_ancestors() {
    let calls = Rc::new(Cell::new(0));
    let adapted = AnyElement::new(AdaptedEnvironment::new(
        |env| {
            let base = env.get::<BaseScale>();
            env.set::<FontScale>(base * 2.0);
        },
        Text::counted(3, &calls),
    ));
    let build = || Column::new().child(adapted.clone());
    let query = SizeConstraint::UNCONSTRAINED;

    let mut tree = ElementStateTree::default();
    tree.update(build(), &Environment::new().with::<BaseScale>(1.0));
    assert_eq!(tree.measure(query), Some(Size::new(60.0, 20.0)));

    tree.update(build(), &Environment::new().with::<BaseScale>(1.5));
    assert_eq!(tree.measure(query), Some(Size::new(90.0, 20.0)));
    assert_eq!(calls.get(), 2);
}

#[test]
fn layouts_are_cached_per_size() {
    let recorder = Rc::new(Recorder::default());
    let mut tree = ElementStateTree::default().with_observer(recorder.clone());
    tree.update(paragraph(&[4, 8]), &Environment::new());

    let frame = Rect::from_size(Size::new(100.0, 60.0));
    let first = tree.layout(frame).expect("root");
    assert_eq!(recorder.count("layout Performed"), 3);

    let second = tree.layout(frame).expect("root");
    assert_eq!(recorder.count("layout Cached"), 3);
    assert_eq!(first, second);

    // At 50 wide the first text keeps its 40x20 frame; the second wraps.
    let _ = tree.layout(Rect::from_size(Size::new(50.0, 60.0)));
    assert_eq!(recorder.count("layout Performed"), 5);

    let root = tree.root().expect("root");
    assert_eq!(tree.state(root).expect("root").cached_layouts(), 2);
}

#[test]
fn storage_cache_does_not_change_results() {
    let frame = Rect::new(Point::new(3.0, 4.0), Size::new(70.0, 90.0));
    let layouts: Vec<_> = [
        LayoutOptions::empty(),
        LayoutOptions::MEASUREABLE_STORAGE_CACHE,
        LayoutOptions::all(),
    ]
    .into_iter()
    .map(|options| {
        let mut tree = ElementStateTree::new(options);
        tree.update(paragraph(&[4, 12, 9]), &Environment::new());
        tree.layout(frame).expect("root").flatten()
    })
    .collect();

    assert_eq!(layouts[0], layouts[1]);
    assert_eq!(layouts[0], layouts[2]);
}

#[test]
fn filled_columns_answer_looser_queries_from_cache() {
    let column = || {
        Column::new()
            .alignment(CrossAlignment::Fill)
            .child(Spacer::new(Size::new(30.0, 20.0)))
    };
    let env = Environment::new();
    let looser = SizeConstraint::width_at_most(50.0);

    for options in [
        LayoutOptions::HINT_RANGE_BOUNDARIES,
        LayoutOptions::SEARCH_UNCONSTRAINED_KEYS,
    ] {
        let mut tree = ElementStateTree::new(options);
        tree.update(column(), &env);
        assert_eq!(tree.measure(SizeConstraint::UNCONSTRAINED), Some(Size::new(30.0, 20.0)));

        let fresh = measure_element(column(), looser, &env, LayoutOptions::empty());
        assert_eq!(fresh, Size::new(30.0, 20.0));
        assert_eq!(tree.measure(looser), Some(fresh), "{options:?}");
    }

    let node = layout_element(
        column(),
        Rect::from_size(Size::new(50.0, 20.0)),
        &env,
        LayoutOptions::default(),
    );
    assert_eq!(node.children[0].frame().size(), Size::new(50.0, 20.0));
}

// ============================================================================
// Properties
// ============================================================================

fn axis_value() -> impl Strategy<Value = Option<u16>> {
    prop::option::weighted(0.8, 0u16..400)
}

fn paragraph_lengths() -> impl Strategy<Value = Vec<u16>> {
    prop::collection::vec(0u16..40, 1..5)
}

fn alignment() -> impl Strategy<Value = CrossAlignment> {
    prop_oneof![
        Just(CrossAlignment::Leading),
        Just(CrossAlignment::Center),
        Just(CrossAlignment::Trailing),
        Just(CrossAlignment::Fill),
    ]
}

/// Texts in a row or a column with the given cross alignment.
fn text_stack(lengths: &[u16], alignment: CrossAlignment, horizontal: bool) -> AnyElement {
    if horizontal {
        lengths
            .iter()
            .fold(Row::new().alignment(alignment), |row, length| row.child(Text::new(*length)))
            .into()
    } else {
        paragraph(lengths).alignment(alignment).into()
    }
}

proptest! {
    #[test]
    fn measurement_is_monotonic(
        lengths in paragraph_lengths(),
        alignment in alignment(),
        horizontal in any::<bool>(),
        width in 0u16..400,
        heights in (0u16..400, 0u16..400),
    ) {
        let (low, high) = (heights.0.min(heights.1), heights.0.max(heights.1));
        let env = Environment::new();
        let measure = |height| {
            measure_element(
                text_stack(&lengths, alignment, horizontal),
                constraint(Some(width), Some(height)),
                &env,
                LayoutOptions::empty(),
            )
        };

        let tight = measure(low);
        let loose = measure(high);
        prop_assert!(tight.height <= loose.height);
        if loose.height <= f32::from(low) {
            prop_assert_eq!(tight.height, loose.height);
        }
    }

    #[test]
    fn width_measurement_is_monotonic(
        lengths in paragraph_lengths(),
        alignment in alignment(),
        horizontal in any::<bool>(),
        widths in (0u16..400, 0u16..400),
        height in axis_value(),
    ) {
        let (low, high) = (widths.0.min(widths.1), widths.0.max(widths.1));
        let env = Environment::new();
        let measure = |width| {
            measure_element(
                text_stack(&lengths, alignment, horizontal),
                constraint(Some(width), height),
                &env,
                LayoutOptions::empty(),
            )
        };

        let tight = measure(low);
        let loose = measure(high);
        prop_assert!(tight.width <= loose.width);
        if loose.width <= f32::from(low) {
            prop_assert_eq!(tight.width, loose.width);
        }
    }

    #[test]
    fn size_cache_is_transparent(
        characters in 0u16..40,
        queries in prop::collection::vec((axis_value(), axis_value()), 1..24),
    ) {
        let text = Text::new(characters);
        let ElementContent::Measure(measure) = text.content() else {
            unreachable!("text is measured by a closure");
        };
        let env = Environment::new();
        let answer = |constraint| measure(constraint, &env);

        let mut plain = HintingSizeCache::new(LayoutOptions::empty());
        let mut hinted = HintingSizeCache::new(LayoutOptions::all());
        for (width, height) in queries {
            let query = constraint(width, height);
            let expected = answer(query);
            prop_assert_eq!(plain.get(query, answer), expected);
            prop_assert_eq!(hinted.get(query, answer), expected);
        }
        prop_assert!(hinted.stats().misses <= plain.stats().misses);
    }

    #[test]
    fn state_tree_caching_is_transparent(
        lengths in paragraph_lengths(),
        alignment in alignment(),
        horizontal in any::<bool>(),
        queries in prop::collection::vec((axis_value(), axis_value()), 1..16),
    ) {
        let env = Environment::new();
        let stack = text_stack(&lengths, alignment, horizontal);
        let mut cached = ElementStateTree::new(LayoutOptions::all());
        cached.update(stack.clone(), &env);

        for (width, height) in queries {
            let query = constraint(width, height);
            let expected = measure_element(stack.clone(), query, &env, LayoutOptions::empty());
            prop_assert_eq!(cached.measure(query), Some(expected));
        }
    }

    #[test]
    fn growth_leaves_no_residual_gap(
        quarters in prop::collection::vec(1u16..400, 1..6),
        extra in 0u16..100,
    ) {
        let widths: Vec<f32> = quarters.iter().map(|q| f32::from(*q) / 4.0).collect();
        #[allow(clippy::cast_precision_loss)]
        let length = widths.iter().sum::<f32>() + f32::from(extra) * widths.len() as f32;

        for underflow in [
            UnderflowDistribution::GrowUniformly,
            UnderflowDistribution::GrowProportionally,
            UnderflowDistribution::SpaceEvenly,
        ] {
            let row = widths
                .iter()
                .fold(Row::new().underflow(underflow), |row, width| row.child(Spacer::width(*width)));
            let node = layout_element(row, Rect::from_size(Size::new(length, 10.0)), &Environment::new(), LayoutOptions::default());
            let spans = spans(&node);
            let end = spans.last().map_or(0.0, |span| span.1);
            // Spans end exactly at the length; reading them back through
            // the attributes' centre costs at most a couple of ulps.
            if underflow != UnderflowDistribution::SpaceEvenly || spans.len() > 1 {
                prop_assert!(
                    (end - length).abs() <= length * f32::EPSILON * 4.0,
                    "{underflow:?} ends at {end}, not {length}"
                );
            }
        }
    }

    #[test]
    fn rounding_keeps_edges_aligned(
        quarters in prop::collection::vec(1u16..200, 1..6),
        extra in 0u16..20,
        scale in prop::sample::select(vec![1.0f32, 2.0, 3.0]),
    ) {
        let widths: Vec<f32> = quarters.iter().map(|q| f32::from(*q) / 4.0).collect();
        #[allow(clippy::cast_precision_loss)]
        let length = widths.iter().sum::<f32>() + f32::from(extra) * widths.len() as f32;

        let row = widths.iter().fold(
            Row::new().underflow(UnderflowDistribution::GrowUniformly),
            |row, width| row.child(Spacer::width(*width)),
        );
        // The row sits 0.3pt into its parent, so every edge starts off the grid.
        let inset = Inset::new(EdgeInsets::new(0.3, 0.0, 0.3, 0.0), row);
        let node = layout_element(
            inset,
            Rect::from_size(Size::new(length + 0.3, 20.0)),
            &Environment::new(),
            LayoutOptions::default(),
        );

        let exact = node.flatten();
        let rounded = node.round(RoundingScale::new(scale)).flatten();
        prop_assert_eq!(exact.len(), rounded.len());

        for ((path, exact), (rounded_path, rounded)) in exact.iter().zip(&rounded) {
            prop_assert_eq!(path, rounded_path);
            for (before, after) in [
                (exact.min_x(), rounded.min_x()),
                (exact.max_x(), rounded.max_x()),
                (exact.min_y(), rounded.min_y()),
                (exact.max_y(), rounded.max_y()),
            ] {
                prop_assert!((before - after).abs() <= 1.0 / scale, "{path}: {before} became {after}");
                let pixels = after * scale;
                prop_assert!((pixels - pixels.round()).abs() < 1e-3, "{path}: {after} is off the grid");
            }
        }

        // Leaves are the spacers, in order, after the inset and the row.
        let leaves = &rounded[2..];
        for pair in leaves.windows(2) {
            prop_assert!((pair[0].1.max_x() - pair[1].1.min_x()).abs() < 1e-3);
        }
    }
}
