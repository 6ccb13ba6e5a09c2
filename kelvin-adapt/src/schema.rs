use kelvin_base::{err, Result};
use kelvin_lang::{Col, ColType};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Field {
    pub name: String,
    pub ty: ColType,
    pub nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: ColType) -> Field {
        Field {
            name: name.into(),
            ty,
            nullable: true,
        }
    }

    pub fn not_null(mut self) -> Field {
        self.nullable = false;
        self
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.ty)?;
        if !self.nullable {
            f.write_str("!")?;
        }
        Ok(())
    }
}

/// The columns a CSV file must carry, in order. The text form is a comma
/// separated list of `name:type`, with a trailing `!` on fields that may
/// not be null, e.g. `sensor_id:int!, location:string`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Result<Schema> {
        if fields.is_empty() {
            return Err(err("schema has no fields"));
        }
        for (i, f) in fields.iter().enumerate() {
            if fields[..i].iter().any(|g| g.name == f.name) {
                return Err(err(format!("schema names `{}` twice", f.name)));
            }
        }
        Ok(Schema { fields })
    }

    /// The declared layout of a sensor readings file.
    pub fn sensor_readings() -> Schema {
        Schema {
            fields: vec![
                Field::new("sensor_id", ColType::Int).not_null(),
                Field::new("timestamp", ColType::Str).not_null(),
                Field::new("temperature", ColType::Flo),
                Field::new("humidity", ColType::Flo),
                Field::new("location", ColType::Str),
                Field::new("sensor_type", ColType::Str),
            ],
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// One empty typed column per field, ready to be filled row by row.
    pub fn empty_cols(&self) -> Vec<Col> {
        self.fields
            .iter()
            .map(|f| Col::empty(f.name.as_str(), f.ty))
            .collect()
    }
}

impl FromStr for Schema {
    type Err = kelvin_base::Error;
    fn from_str(s: &str) -> Result<Schema> {
        let mut fields = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (name, ty) = part
                .split_once(':')
                .ok_or_else(|| err(format!("schema field `{part}` is not `name:type`")))?;
            let (ty, nullable) = match ty.trim().strip_suffix('!') {
                Some(t) => (t, false),
                None => (ty, true),
            };
            let ty = ty.parse::<ColType>().map_err(err)?;
            let name = name.trim();
            if name.is_empty() {
                return Err(err(format!("schema field `{part}` has no name")));
            }
            fields.push(Field {
                name: name.to_string(),
                ty,
                nullable,
            });
        }
        Schema::new(fields)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}
