use std::fmt;

use super::{NodeId, Tree, Value};

impl Tree {
    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, indent: &str) -> fmt::Result {
        let node = self.node(id);
        writeln!(f, "{}", node.name)?;
        write!(f, "{indent}{{")?;
        let inner = format!("{indent}\t");
        for property in &node.properties {
            write!(f, "\n{inner}{} = ", property.key)?;
            match &property.value {
                Value::Scalar(expr) => write!(f, "{expr}")?,
                Value::List(items) => {
                    f.write_str("[")?;
                    for (i, item) in items.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{item}")?;
                    }
                    f.write_str("]")?;
                }
                Value::Nested(child) => self.fmt_node(f, *child, &inner)?,
                Value::Reference(reference) => f.write_str(&reference.name)?,
            }
        }
        write!(f, "\n{indent}}}")
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, self.root(), "")
    }
}
