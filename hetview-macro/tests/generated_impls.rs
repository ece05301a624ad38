use hetview::least::Least;
use hetview::predicate::TypeList;
use hetview::prelude::*;
use hetview::unary::{ToConstant, ToUnary, S, Z};
use static_assertions::{assert_impl_all, assert_not_impl_any, assert_type_eq_all};

assert_type_eq_all!(<Number<0> as ToUnary>::AsUnary, Z);
assert_type_eq_all!(<Number<3> as ToUnary>::AsUnary, S<S<S<Z>>>);
assert_type_eq_all!(<S<S<Z>> as ToConstant>::AsConstant, Number<2>);

assert_type_eq_all!(<Number<127> as Least>::Type, i8);
assert_type_eq_all!(<Number<128> as Least>::Type, u8);
assert_type_eq_all!(<Number<128> as Least>::Signed, i16);
assert_type_eq_all!(<Number<128> as Least>::Unsigned, u16);

assert_type_eq_all!(<() as TupleLike>::Length, Number<0>);
assert_type_eq_all!(<(u8,) as TupleLike>::Length, Number<1>);
assert_type_eq_all!(Element<(u8, char, String), 2>, String);
assert_impl_all!(
    (u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8,
     u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, char):
    TupleLike, Get<31>, TypeList
);
assert_not_impl_any!((u8, char): Get<2>);

struct Label;

impl<const I: usize> Visit<Index<I>> for Label {
    type Output = &'static str;

    fn visit(&mut self, _: Index<I>) -> &'static str {
        ["zero", "one", "two"][I % 3]
    }
}

struct OnlyZero;

impl Visit<Index<0>> for OnlyZero {
    type Output = ();

    fn visit(&mut self, _: Index<0>) {}
}

assert_impl_all!(Label: VisitEach<Number<1>>, VisitEach<Number<64>>, VisitEach<Number<128>>);
assert_impl_all!(OnlyZero: VisitEach<Number<0>>, VisitEach<Number<1>>);
assert_not_impl_any!(OnlyZero: VisitEach<Number<2>>);

#[test]
fn jump_table_reaches_every_position() {
    for position in 0..128 {
        let label = VisitEach::<Number<128>>::visit_at(Label, position);
        assert_eq!(label, ["zero", "one", "two"][position % 3]);
    }
}

#[test]
fn tuple_getters_follow_field_order() {
    let mut triple = (1_u8, 'b', String::from("c"));
    assert_eq!(*Get::<1>::get(&triple), 'b');
    Get::<2>::get_mut(&mut triple).push('!');
    assert_eq!(Get::<2>::into_element(triple), "c!");
}

#[test]
fn type_lists_follow_field_order() {
    use std::any::TypeId;

    assert_eq!(
        <(u8, char) as TypeList>::type_ids(),
        [TypeId::of::<u8>(), TypeId::of::<char>()]
    );
    assert!(<() as TypeList>::type_ids().is_empty());
}
