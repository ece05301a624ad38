use std::fmt::{self, Display, Formatter};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::{env, error::Error};

/// The largest count for which dispatch tables are generated.
const MAX_COUNT: usize = 128;

fn main() -> Result<(), Box<dyn Error>> {
    // We auto-generate unit tests for every supported count. This makes it much less likely that an
    // off-by-one in one of the generated impls goes un-caught.
    println!("cargo:rerun-if-changed=build.rs");

    // Open a file to write to it in the output directory for the build
    let out_dir = env::var("OUT_DIR")?;
    let dest_path = Path::new(&out_dir).join("counts.rs");
    let mut f = File::create(&dest_path)?;

    // File header
    writeln!(f, "use crate::least::{{least, least_signed, Least, Primitive}};")?;
    writeln!(f, "use crate::meta_iota::meta_iota;")?;
    writeln!(f, "use crate::unary::Number;")?;
    writeln!(f, "use crate::visit::{{Index, Visit}};")?;
    writeln!(f)?;
    writeln!(f, "struct Position;")?;
    writeln!(f)?;
    writeln!(f, "impl<const I: usize> Visit<Index<I>> for Position {{")?;
    writeln!(f, "    type Output = usize;")?;
    writeln!(f)?;
    writeln!(f, "    fn visit(&mut self, _: Index<I>) -> usize {{")?;
    writeln!(f, "        I")?;
    writeln!(f, "    }}")?;
    writeln!(f, "}}")?;
    writeln!(f)?;
    writeln!(f, "fn widths_agree<N: Least>(count: u128) {{")?;
    writeln!(
        f,
        "    assert_eq!(<N::Type as Primitive>::WIDTH, least(count), \"any, count {{}}\", count);"
    )?;
    writeln!(
        f,
        "    assert_eq!(<N::Signed as Primitive>::WIDTH, least_signed(count), \"signed, count {{}}\", count);"
    )?;
    writeln!(
        f,
        "    assert_eq!(<N::Unsigned as Primitive>::WIDTH, least_signed(count).to_unsigned(), \"unsigned, count {{}}\", count);"
    )?;
    writeln!(f, "}}")?;
    writeln!(f)?;

    // Write out the test
    writeln!(f, "#[test]")?;
    writeln!(f, "fn every_count_dispatches() {{")?;
    for count in (0..=MAX_COUNT).map(Count) {
        write!(f, "{}", count)?;
    }
    writeln!(f, "}}")?;
    Ok(())
}

/// The assertions for one count.
#[derive(Clone, Copy, Debug)]
struct Count(usize);

impl Display for Count {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let n = self.0;
        writeln!(f, "    assert_eq!(meta_iota::<{}>().len(), {});", n, n)?;
        writeln!(f, "    assert_eq!(meta_iota::<{}>().iter().count(), {});", n, n)?;
        writeln!(f, "    widths_agree::<Number<{}>>({});", n, n)?;
        if let Some(last) = n.checked_sub(1) {
            writeln!(
                f,
                "    assert_eq!(meta_iota::<{}>().get({}).map(|t| t.invoke(Position)), Some({}));",
                n, last, last
            )?;
        }
        writeln!(f, "    assert!(meta_iota::<{}>().get({}).is_none());", n, n)
    }
}
