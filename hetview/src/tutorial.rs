/*! The introductory tutorial for hetview (nothing is exported from this module).

# Getting started with hetview

The first step is deciding what to do with each element.

A closure can only take one type of argument, and the elements of a tuple have as many types as
there are elements. So instead of closures, this crate visits elements with *visitors*: types
implementing [`Visit<T>`](crate::visit::Visit), usually generically over `T`. Here is a visitor
which renders anything displayable:

```
use hetview::prelude::*;
use std::fmt::Display;

struct Render;

impl<T: Display> Visit<&T> for Render {
    type Output = String;

    fn visit(&mut self, value: &T) -> String {
        value.to_string()
    }
}
```

To apply it to a tuple, we make a [`view`](crate::view()) of the tuple. A view is a sequence: it
has a length, and it can be iterated. Each item of the iteration is an
[`Accessor`](crate::view::Accessor), and every accessor of one view has the same type, whatever
the type of the element it refers to. Applying an accessor to a visitor is what finally reads the
element:

```
# use hetview::prelude::*;
# use std::fmt::Display;
# struct Render;
# impl<T: Display> Visit<&T> for Render {
#     type Output = String;
#     fn visit(&mut self, value: &T) -> String { value.to_string() }
# }
let record = (1, "two", 3.5);
let fields = view(&record);
assert_eq!(fields.len(), 3);

let rendered: Vec<String> = fields.iter().map(|field| field.apply(Render)).collect();
assert_eq!(rendered, ["1", "two", "3.5"]);
```

Because the accessors are all the same type, everything from [`std::iter`] is available: `rev`,
`zip`, `filter`, `collect` and the rest. The only requirement is on the visitor: it must accept
*every* element of the view, with one common output type. A view has no way of knowing ahead of
time which position an accessor will be applied at, so it needs a visitor ready for all of them.

## Visitors with state

[`Visit::visit`](crate::visit::Visit::visit) takes `&mut self`, so a visitor can accumulate
state. Pass `&mut visitor` to keep the visitor, rather than giving it away:

```
# use hetview::prelude::*;
struct Count(usize);

impl<T> Visit<&T> for Count {
    type Output = ();

    fn visit(&mut self, _: &T) {
        self.0 += 1;
    }
}

let mut count = Count(0);
view(&(1, 'a', "b")).for_each(&mut count);
view(&[0.5; 4]).for_each(&mut count);
assert_eq!(count.0, 7);
```

A visitor need not be generic. Implementing [`Visit`](crate::visit::Visit) once for each element
type is fine, as long as the outputs agree:

```
# use hetview::prelude::*;
struct Weigh;

impl Visit<&u8> for Weigh {
    type Output = f64;
    fn visit(&mut self, byte: &u8) -> f64 {
        f64::from(*byte)
    }
}

impl Visit<&&str> for Weigh {
    type Output = f64;
    fn visit(&mut self, text: &&str) -> f64 {
        text.len() as f64
    }
}

let total: f64 = view(&(4_u8, "four")).iter().map(|field| field.apply(Weigh)).sum();
assert_eq!(total, 8.0);
```

And when every element has the same type, as in an array, a closure will do after all, with the
help of [`from_fn`](crate::visit::from_fn).

# Positions as values: `meta_iota`

Underneath every view is a simpler sequence: [`meta_iota::<N>()`](crate::meta_iota()), the
positions `0..N`. Each of its items is a [`Token`](crate::Token), which holds a position as a
runtime value but hands it to a visitor as the compile-time [`Index<I>`](crate::visit::Index):

```
# use hetview::prelude::*;
struct Name;

impl<const I: usize> Visit<Index<I>> for Name {
    type Output = String;

    fn visit(&mut self, _: Index<I>) -> String {
        format!("position {}", I)
    }
}

let positions = meta_iota::<3>();
let names: Vec<String> = positions.iter().map(|token| token.invoke(Name)).collect();
assert_eq!(names, ["position 0", "position 1", "position 2"]);
```

Tokens for positions known at compile time are checked at compile time:

```
# use hetview::prelude::*;
let middle = Token::<Number<3>>::at::<1>();
assert_eq!(middle.position(), 1);
assert!(Token::<Number<3>>::new(3).is_err());
```

```compile_fail
# use hetview::prelude::*;
let past_the_end = Token::<Number<3>>::at::<3>();
```

Invoking a token is a jump: a `match` on the position, generated once per count, whose arms each
call the visitor with a different `Index<I>`. There is no allocation and no dynamic dispatch.

# Composition

A token is itself a callable: called with a visitor, it invokes the visitor at its position.
Callables in this crate implement [`FuncOnce`](crate::compose::FuncOnce) and
[`Func`](crate::compose::Func), which closures implement too, and compose with
[`compose`](crate::compose()): `compose(f, g)` is the callable `x ↦ f(g(x))`.

```
# use hetview::prelude::*;
# struct Name;
# impl<const I: usize> Visit<Index<I>> for Name {
#     type Output = String;
#     fn visit(&mut self, _: Index<I>) -> String { format!("position {}", I) }
# }
let name_length = compose(|name: String| name.len(), Token::<Number<12>>::at::<10>());
assert_eq!(name_length.call(Name), "position 10".len());

let negate = |x: i32| -x;
let square = |x: i32| x * x;
assert_eq!(compose!(negate, square).call(3), -9);
```

An accessor is exactly this kind of composition: its token, composed after a binding which pairs
the visitor with the view's storage. That is why building accessors costs nothing, and why an
accessor can be applied any number of times.

The flip side of composition is [`project`](crate::project): `project(f)` is the callable which
takes a callable `v` and returns `v(f)`. Mapped over a sequence of accessors, it applies the same
visitor everywhere:

```
# use hetview::prelude::*;
# use std::fmt::Display;
# #[derive(Clone)]
# struct Render;
# impl<T: Display> Visit<&T> for Render {
#     type Output = String;
#     fn visit(&mut self, value: &T) -> String { value.to_string() }
# }
let row = ('a', 2_u16, 3.5_f32);
let rendered = hetview::cursor::collect_with(&view(&row), project(Render));
assert_eq!(rendered, ["a", "2", "3.5"]);
```

# Cursors

Views and `meta_iota` sequences both have random-access cursors. A cursor can move any distance
in constant time, cursors can be subtracted, and every sequence ends in the same sentinel,
[`End`](crate::cursor::End):

```
# use hetview::prelude::*;
# use std::fmt::Display;
# struct Render;
# impl<T: Display> Visit<&T> for Render {
#     type Output = String;
#     fn visit(&mut self, value: &T) -> String { value.to_string() }
# }
let row = ('a', 2_u16, 3.5_f32, "d");
let fields = view(&row);

let third = fields.begin() + 2;
assert_eq!(third.get().apply(Render), "3.5");
assert_eq!(third.at(-2).apply(Render), "a");
assert_eq!(fields.end() - third, 2);
assert!(third + 2 == fields.end());
```

Moving a cursor never fails: only reading at a position outside the sequence panics.

# Changing elements

A view made by [`view_mut`](crate::view_mut) can also hand elements to visitors by unique
reference:

```
# use hetview::prelude::*;
struct Reset;

impl<T: Default> Visit<&mut T> for Reset {
    type Output = ();

    fn visit(&mut self, value: &mut T) {
        *value = T::default();
    }
}

let mut state = (5_u32, String::from("busy"), Some('x'));
view_mut(&mut state).for_each_mut(Reset);
assert_eq!(state, (0, String::new(), None));
```

To change just one element, walk to it with [`begin_mut`](crate::TupleView::begin_mut), and
apply the [`AccessorMut`](crate::view::AccessorMut) the cursor yields.

# Owning the aggregate

A view made by [`view_owned`](crate::view_owned) owns its tuple. Besides everything a borrowing
view can do, it can give up the whole tuple for a single element, moved out by value:

```
# use hetview::prelude::*;
# use std::fmt::Debug;
struct Describe;

impl<T: Debug> Visit<T> for Describe {
    type Output = String;

    fn visit(&mut self, value: T) -> String {
        format!("{:?}", value)
    }
}

# fn main() -> Result<(), hetview::OutOfBounds> {
let owned = view_owned((String::from("kept"), 7_u8));
assert_eq!(owned.into_accessor(0)?.apply(Describe), "\"kept\"");
# Ok(())
# }
```

Owned views can be reassigned from one another, and this is where the two
[`storage`](crate::storage) strategies differ. The default, [`Rebuild`](crate::storage::Rebuild),
moves the tuple out of the source, leaving the source *vacant*. Reading a vacant view is an
error, which [`try_apply`](crate::view::Accessor::try_apply) reports without panicking:

```
# use hetview::prelude::*;
# use std::fmt::Display;
# struct Render;
# impl<T: Display> Visit<&T> for Render {
#     type Output = String;
#     fn visit(&mut self, value: &T) -> String { value.to_string() }
# }
let mut current = view_owned((1, 'a'));
let mut next = view_owned((2, 'b'));
current.assign_from(&mut next);

assert!(next.is_vacant());
assert!(next.begin().get().try_apply(Render).is_err());
assert_eq!(current.begin().get().apply(Render), "2");
```

The alternative, [`InPlace`](crate::storage::InPlace), made by
[`view_owned_in_place`](crate::view_owned_in_place), is never vacant: reassignment leaves a
default tuple behind in the source, and replacing the tuple rewrites it at the same address.

```
# use hetview::prelude::*;
let mut current = view_owned_in_place((1, String::from("a")));
let mut next = view_owned_in_place((2, String::from("b")));
current.assign_from(&mut next);
assert_eq!(next.try_into_inner(), Ok((0, String::new())));
```

The price is that a panic while building a replacement tuple in place cannot be recovered from,
so it aborts the process.

# Beyond tuples

Tuples up to arity 32 and arrays are views out of the box. Your own types can join in by
implementing [`TupleLike`](crate::tuple::TupleLike) and [`Get`](crate::tuple::Get), and types
you cannot implement traits for can be read through an [`Extract`](crate::tuple::Extract)
policy instead: see the [`tuple`](crate::tuple) module. The [`predicate`](crate::predicate)
module answers questions about the element types of a tuple, such as whether they are all
distinct:

```
use hetview::predicate::{all_unique, position_of};

assert!(all_unique::<(u8, char, String)>());
assert!(!all_unique::<(u8, char, u8)>());
assert_eq!(position_of::<char, (u8, char, String)>(), Some(1));
```
*/
