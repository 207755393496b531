//! Storage contract for list-valued columns (`augments`, `traits`).
//!
//! Items are joined with [`DELIMITER`]. An item is accepted only if it is
//! non-empty, carries no leading or trailing whitespace and does not contain
//! the delimiter, so `decode(encode(list)) == list` holds for every
//! [`IdList`]. The empty list is stored as the empty string.

use std::ops::Deref;

use crate::{Error, Result};

pub const DELIMITER: char = ',';

/// An ordered list of upstream identifiers that is safe to flatten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdList(Vec<String>);

impl IdList {
  /// Validate every item; fails on the first one that would be ambiguous.
  pub fn new<I, S>(items: I) -> Result<Self>
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let items = items
      .into_iter()
      .map(Into::into)
      .map(validate)
      .collect::<Result<Vec<_>>>()?;
    Ok(Self(items))
  }

  pub fn encode(&self) -> String {
    let mut out = String::new();
    for (i, item) in self.0.iter().enumerate() {
      if i > 0 {
        out.push(DELIMITER);
      }
      out.push_str(item);
    }
    out
  }

  pub fn decode(s: &str) -> Result<Self> {
    if s.is_empty() {
      return Ok(Self::default());
    }
    Self::new(s.split(DELIMITER))
  }
}

impl Deref for IdList {
  type Target = [String];

  fn deref(&self) -> &[String] { &self.0 }
}

fn validate(item: String) -> Result<String> {
  if item.is_empty() || item.trim() != item || item.contains(DELIMITER) {
    return Err(Error::InvalidListItem(item));
  }
  Ok(item)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_list_is_empty_string() {
    let list = IdList::new(Vec::<String>::new()).unwrap();
    assert_eq!(list.encode(), "");
    assert!(IdList::decode("").unwrap().is_empty());
  }

  #[test]
  fn preserves_order() {
    let list =
      IdList::new(["TFT9_Augment_Second", "TFT9_Augment_First"]).unwrap();
    assert_eq!(list.encode(), "TFT9_Augment_Second,TFT9_Augment_First");
    assert_eq!(IdList::decode(&list.encode()).unwrap(), list);
  }

  #[test]
  fn rejects_delimiter_inside_item() {
    let err = IdList::new(["Set9_Bruiser", "Bad,Trait"]).unwrap_err();
    assert!(matches!(err, Error::InvalidListItem(s) if s == "Bad,Trait"));
  }

  #[test]
  fn rejects_empty_and_padded_items() {
    assert!(IdList::new([""]).is_err());
    assert!(IdList::new([" Set9_Bruiser"]).is_err());
    // "a,,b" would otherwise decode to a list with an empty member.
    assert!(IdList::decode("a,,b").is_err());
  }
}
