use hetview::cursor::{self, RandomAccess};
use hetview::prelude::*;
use hetview::tuple::Extract;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

/// Install a subscriber so that owned-slot reassignments show up under `RUST_LOG=hetview=trace`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct Stringify;

impl Visit<&i32> for Stringify {
    type Output = String;

    fn visit(&mut self, value: &i32) -> String {
        value.to_string()
    }
}

impl Visit<&&str> for Stringify {
    type Output = String;

    fn visit(&mut self, value: &&str) -> String {
        value.to_string()
    }
}

impl Visit<&f64> for Stringify {
    type Output = String;

    fn visit(&mut self, value: &f64) -> String {
        format!("{:?}", value)
    }
}

#[test]
fn stringify_mixed_tuple() {
    let aggregate = (1, "two", 3.0);
    let fields = view(&aggregate);
    assert_eq!(fields.len(), 3);

    let strings: Vec<String> = fields.iter().map(|field| field.apply(Stringify)).collect();
    assert_eq!(strings, ["1", "two", "3.0"]);

    let begin = fields.begin();
    assert!(begin + 3 == fields.end());
    assert_eq!(fields.end() - begin, 3);
    assert_eq!(begin.distance_to_end(), 3);
    assert_eq!(cursor::len(&fields), 3);
}

#[test]
fn compose_applies_inner_first() {
    let negate = |x: i32| -x;
    let square = |x: i32| x * x;
    assert_eq!(compose!(negate, square).call(3), -9);
    assert_eq!(compose!(square, negate).call(3), 9);
}

#[test]
fn empty_dispatch_sequence() {
    let positions = meta_iota::<0>();
    assert!(positions.begin() == positions.end());
    assert!(positions.is_empty());
    assert_eq!(positions.iter().next(), None);
    assert!(positions.get(0).is_none());
}

#[test]
fn tokens_dispatch_to_their_position() {
    struct Squares;

    impl<const I: usize> Visit<Index<I>> for Squares {
        type Output = usize;

        fn visit(&mut self, index: Index<I>) -> usize {
            index.value() * index.value()
        }
    }

    let positions = meta_iota::<100>();
    let squares: Vec<usize> = positions.iter().rev().take(3).map(|t| t.invoke(Squares)).collect();
    assert_eq!(squares, [99 * 99, 98 * 98, 97 * 97]);
    assert_eq!(Token::<Number<100>>::new(100).map(|t| t.position()).unwrap_err().bound(), 100);
}

#[test]
fn visitor_results_propagate_untouched() {
    struct Parse;

    impl Visit<&&str> for Parse {
        type Output = Result<i64, std::num::ParseIntError>;

        fn visit(&mut self, text: &&str) -> Self::Output {
            text.parse()
        }
    }

    impl Visit<&i64> for Parse {
        type Output = Result<i64, std::num::ParseIntError>;

        fn visit(&mut self, value: &i64) -> Self::Output {
            Ok(*value)
        }
    }

    let inputs = ("12", 30_i64, "x");
    let parsed: Vec<_> = view(&inputs).iter().map(|field| field.apply(Parse)).collect();
    assert_eq!(parsed[0], Ok(12));
    assert_eq!(parsed[1], Ok(30));
    assert!(parsed[2].is_err());
}

#[test]
fn borrowed_mutation() {
    struct Grow;

    impl Visit<&mut Vec<u8>> for Grow {
        type Output = usize;

        fn visit(&mut self, bytes: &mut Vec<u8>) -> usize {
            bytes.push(0);
            bytes.len()
        }
    }

    impl Visit<&mut String> for Grow {
        type Output = usize;

        fn visit(&mut self, text: &mut String) -> usize {
            text.push('+');
            text.len()
        }
    }

    let mut buffers = (vec![1_u8], String::from("ab"));
    let mut fields = view_mut(&mut buffers);
    let mut cursor = fields.begin_mut();
    let mut lengths = Vec::new();
    while cursor != End {
        lengths.push(cursor.get().apply(Grow));
        cursor += 1;
    }
    assert_eq!(lengths, [2, 3]);
    assert_eq!(buffers, (vec![1, 0], String::from("ab+")));

    let mut fields = view_mut(&mut buffers);
    let mut cursor = fields.begin_mut();
    cursor += 1;
    assert_eq!(cursor.get().apply(Grow), 4);
    assert_eq!(cursor.at(-1).apply(Grow), 3);
    assert_eq!(buffers.1, "ab++");
}

#[test]
fn owned_move_assignment_leaves_source_vacant() {
    init_tracing();

    let witness = Rc::new('t');
    let mut target = view_owned((Rc::clone(&witness), 1_u8));
    let mut source = view_owned((Rc::new('s'), 2_u8));
    assert_eq!(Rc::strong_count(&witness), 2);

    target.assign_from(&mut source);
    assert!(source.is_vacant());
    assert_eq!(Rc::strong_count(&witness), 1);

    let vacant = source.get(0).map(|field| field.try_apply(Clip));
    assert_eq!(vacant, Some(Err(Vacant::default())));
    assert_eq!(target.get(0).map(|field| field.apply(Clip)), Some(b's'));
    assert_eq!(target.get(1).map(|field| field.apply(Clip)), Some(2));

    // Assigning from a vacant view empties the target too.
    target.assign_from(&mut source);
    assert!(target.is_vacant());
    assert_eq!(target.try_into_inner(), Err(Vacant::default()));
}

struct Clip;

impl Visit<&Rc<char>> for Clip {
    type Output = u8;

    fn visit(&mut self, value: &Rc<char>) -> u8 {
        **value as u8
    }
}

impl Visit<&u8> for Clip {
    type Output = u8;

    fn visit(&mut self, value: &u8) -> u8 {
        *value
    }
}

#[test]
fn owned_rebuild_replaces_the_aggregate() {
    init_tracing();

    let mut owned = view_owned((String::from("old"), 0_u16));
    owned.rebuild_with(|| (String::from("new"), 7));
    owned.replace((String::from("newer"), 8));
    assert_eq!(owned.try_into_inner(), Ok((String::from("newer"), 8)));

    let mut in_place = view_owned_in_place((String::from("old"), 0_u16));
    in_place.rebuild_with(|| (String::from("new"), 7));
    assert_eq!(in_place.try_into_inner(), Ok((String::from("new"), 7)));
}

#[test]
fn extracting_through_a_policy() {
    struct Backwards;

    impl Extract<(u8, char), 0> for Backwards {
        type Element = char;
        fn extract(a: &(u8, char)) -> &char {
            &a.1
        }
        fn extract_mut(a: &mut (u8, char)) -> &mut char {
            &mut a.1
        }
        fn extract_owned(a: (u8, char)) -> char {
            a.1
        }
    }

    impl Extract<(u8, char), 1> for Backwards {
        type Element = u8;
        fn extract(a: &(u8, char)) -> &u8 {
            &a.0
        }
        fn extract_mut(a: &mut (u8, char)) -> &mut u8 {
            &mut a.0
        }
        fn extract_owned(a: (u8, char)) -> u8 {
            a.0
        }
    }

    struct Show;

    impl<T: ToString> Visit<&T> for Show {
        type Output = String;

        fn visit(&mut self, value: &T) -> String {
            value.to_string()
        }
    }

    let pair = (7_u8, 'x');
    let reversed = view(&pair).with_extractor::<Backwards>();
    let shown: Vec<String> = reversed.iter().map(|field| field.apply(Show)).collect();
    assert_eq!(shown, ["x", "7"]);
}

#[test]
fn collecting_over_both_sequences() {
    #[derive(Clone, Copy)]
    struct Size;

    impl<T> Visit<&T> for Size {
        type Output = usize;

        fn visit(&mut self, _: &T) -> usize {
            std::mem::size_of::<T>()
        }
    }

    #[derive(Clone, Copy)]
    struct Double;

    impl<const I: usize> Visit<Index<I>> for Double {
        type Output = usize;

        fn visit(&mut self, _: Index<I>) -> usize {
            2 * I
        }
    }

    let record = (0_u8, 0_u32, 0_u16);
    assert_eq!(cursor::collect_with(&view(&record), project(Size)), [1, 4, 2]);
    assert_eq!(cursor::collect_with(meta_iota::<3>(), project(Double)), [0, 2, 4]);

    let fields = view(&record);
    let last = cursor::next(fields.begin(), 2);
    assert_eq!(cursor::distance(&fields.begin(), &last), 2);
    assert_eq!(cursor::prev(last, 2).position(), 0);
}

#[derive(Debug, Clone, PartialEq)]
enum Field {
    Byte(u8),
    Text(String),
    Letter(char),
}

/// Clones each element out of its aggregate, tagged with its type.
struct Identity;

impl Visit<&u8> for Identity {
    type Output = Field;

    fn visit(&mut self, value: &u8) -> Field {
        Field::Byte(*value)
    }
}

impl Visit<&String> for Identity {
    type Output = Field;

    fn visit(&mut self, value: &String) -> Field {
        Field::Text(value.clone())
    }
}

impl Visit<&char> for Identity {
    type Output = Field;

    fn visit(&mut self, value: &char) -> Field {
        Field::Letter(*value)
    }
}

impl Visit<u8> for Identity {
    type Output = Field;

    fn visit(&mut self, value: u8) -> Field {
        Field::Byte(value)
    }
}

impl Visit<String> for Identity {
    type Output = Field;

    fn visit(&mut self, value: String) -> Field {
        Field::Text(value)
    }
}

impl Visit<char> for Identity {
    type Output = Field;

    fn visit(&mut self, value: char) -> Field {
        Field::Letter(value)
    }
}

fn reassemble(fields: &[Field]) -> Option<(u8, String, char)> {
    match fields {
        [Field::Byte(byte), Field::Text(text), Field::Letter(letter)] => {
            Some((*byte, text.clone(), *letter))
        }
        _ => None,
    }
}

#[test]
fn identity_visits_reassemble_the_aggregate() -> Result<(), Box<dyn std::error::Error>> {
    let record = (7_u8, String::from("seven"), '7');

    let borrowed: Vec<Field> = view(&record).iter().map(|field| field.apply(Identity)).collect();
    assert_eq!(reassemble(&borrowed), Some(record.clone()));

    let mut moved = Vec::new();
    for position in 0..view(&record).len() {
        let accessor = view_owned(record.clone()).into_accessor(position)?;
        moved.push(accessor.apply(Identity));
    }
    assert_eq!(moved, borrowed);
    assert_eq!(reassemble(&moved), Some(record));
    Ok(())
}

#[test]
fn reference_views_visit_the_fields_themselves() {
    #[derive(Default)]
    struct Addresses(Vec<usize>);

    impl<'e, T> Visit<&'e mut T> for Addresses {
        type Output = ();

        fn visit(&mut self, value: &'e mut T) {
            self.0.push(value as *mut T as usize);
        }
    }

    impl<'e, T> Visit<&'e T> for Addresses {
        type Output = ();

        fn visit(&mut self, value: &'e T) {
            self.0.push(value as *const T as usize);
        }
    }

    let mut record = (1_u8, String::from("x"), 2.5_f64, [0_u16; 3]);
    let expected = [
        &record.0 as *const u8 as usize,
        &record.1 as *const String as usize,
        &record.2 as *const f64 as usize,
        &record.3 as *const [u16; 3] as usize,
    ];

    let mut unique = Addresses::default();
    view_mut(&mut record).for_each_mut(&mut unique);
    assert_eq!(unique.0, expected);

    let mut shared = Addresses::default();
    view(&record).for_each(&mut shared);
    assert_eq!(shared.0, expected);
}
