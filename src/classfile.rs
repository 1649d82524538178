use anyhow::{Result, bail};

const MAGIC: u32 = 0xCAFE_BABE;
const ACC_PUBLIC: u16 = 0x0001;

/// Structural information from a class file header. Names are in dotted
/// (binary) form, e.g. `org.example.Foo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassHeader {
    pub class_name: String,
    /// Absent only for `java.lang.Object`, which has no superclass.
    pub superclass_name: Option<String>,
    pub interface_names: Vec<String>,
}

/// Parses a class file up to the interfaces table: magic, constant pool,
/// access flags, this/super class, implemented interfaces. Method bodies,
/// attributes and debug info are never read, so malformed bytecode past the
/// header does not affect the scan.
///
/// Returns `None` for non-public classes; corrupt header data is an error.
pub fn parse_header(bytes: &[u8]) -> Result<Option<ClassHeader>> {
    let mut r = Reader::new(bytes);

    if r.u32()? != MAGIC {
        bail!("not a class file (bad magic)");
    }
    r.skip(4)?; // minor + major version

    let cp_count = r.u16()? as usize;
    let mut pool = vec![CpEntry::Unused; cp_count.max(1)];
    let mut idx = 1;
    while idx < cp_count {
        let tag = r.u8()?;
        match tag {
            1 => {
                let len = r.u16()? as usize;
                let raw = r.bytes(len)?;
                pool[idx] = CpEntry::Utf8(String::from_utf8_lossy(raw).into_owned());
            }
            7 => pool[idx] = CpEntry::Class(r.u16()?),
            8 | 16 | 19 | 20 => r.skip(2)?,
            15 => r.skip(3)?,
            3 | 4 | 9 | 10 | 11 | 12 | 17 | 18 => r.skip(4)?,
            // long and double occupy two constant pool slots
            5 | 6 => {
                r.skip(8)?;
                idx += 1;
            }
            t => bail!("unknown constant pool tag {t} at index {idx}"),
        }
        idx += 1;
    }

    let access_flags = r.u16()?;
    let this_class = r.u16()?;
    let super_class = r.u16()?;
    let interface_count = r.u16()? as usize;
    let mut interface_indices = Vec::with_capacity(interface_count);
    for _ in 0..interface_count {
        interface_indices.push(r.u16()?);
    }

    if access_flags & ACC_PUBLIC == 0 {
        return Ok(None);
    }

    let class_name = class_name_at(&pool, this_class)?;
    let superclass_name = if super_class == 0 {
        None
    } else {
        Some(class_name_at(&pool, super_class)?)
    };
    let interface_names = interface_indices
        .iter()
        .map(|&i| class_name_at(&pool, i))
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(ClassHeader {
        class_name,
        superclass_name,
        interface_names,
    }))
}

#[derive(Debug, Clone)]
enum CpEntry {
    Unused,
    Utf8(String),
    Class(u16),
}

fn class_name_at(pool: &[CpEntry], index: u16) -> Result<String> {
    let Some(CpEntry::Class(name_index)) = pool.get(index as usize) else {
        bail!("constant pool index {index} is not a class entry");
    };
    let Some(CpEntry::Utf8(name)) = pool.get(*name_index as usize) else {
        bail!("class entry {index} points to non-utf8 constant {name_index}");
    };
    Ok(name.replace('/', "."))
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(len).filter(|&e| e <= self.bytes.len());
        let Some(end) = end else {
            bail!("truncated class file (need {len} bytes at offset {})", self.pos);
        };
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn skip(&mut self, len: usize) -> Result<()> {
        self.bytes(len).map(|_| ())
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.bytes(1)?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        let b = self.bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32> {
        let b = self.bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACC_SUPER: u16 = 0x0020;

    fn push_class(pool: &mut Vec<Vec<u8>>, name: &str) -> u16 {
        let raw = name.replace('.', "/").into_bytes();
        let mut utf8 = vec![1u8];
        utf8.extend((raw.len() as u16).to_be_bytes());
        utf8.extend(raw);
        pool.push(utf8);
        let utf8_index = pool.len() as u16;
        let mut class = vec![7u8];
        class.extend(utf8_index.to_be_bytes());
        pool.push(class);
        pool.len() as u16
    }

    fn class_bytes(
        access: u16,
        name: &str,
        superclass: Option<&str>,
        interfaces: &[&str],
    ) -> Vec<u8> {
        let mut pool: Vec<Vec<u8>> = Vec::new();
        let this_index = push_class(&mut pool, name);
        let super_index = superclass.map_or(0, |s| push_class(&mut pool, s));
        let interface_indices: Vec<u16> =
            interfaces.iter().map(|i| push_class(&mut pool, i)).collect();

        // a long constant, to exercise the two-slot rule
        pool.push({
            let mut long = vec![5u8];
            long.extend(42u64.to_be_bytes());
            long
        });
        let slots: usize = pool.len() + 1; // long takes an extra slot

        let mut out = Vec::new();
        out.extend(0xCAFE_BABEu32.to_be_bytes());
        out.extend(0u16.to_be_bytes());
        out.extend(52u16.to_be_bytes());
        out.extend(((slots + 1) as u16).to_be_bytes());
        for entry in &pool {
            out.extend(entry);
        }
        out.extend(access.to_be_bytes());
        out.extend(this_index.to_be_bytes());
        out.extend(super_index.to_be_bytes());
        out.extend((interface_indices.len() as u16).to_be_bytes());
        for index in interface_indices {
            out.extend(index.to_be_bytes());
        }
        out
    }

    #[test]
    fn parses_public_class_header() -> Result<()> {
        let bytes = class_bytes(
            ACC_PUBLIC | ACC_SUPER,
            "org.example.Foo",
            Some("org.example.Base"),
            &["java.io.Serializable", "java.lang.Comparable"],
        );

        let header = parse_header(&bytes)?.expect("public class should produce a header");
        assert_eq!(header.class_name, "org.example.Foo");
        assert_eq!(header.superclass_name.as_deref(), Some("org.example.Base"));
        assert_eq!(
            header.interface_names,
            vec!["java.io.Serializable", "java.lang.Comparable"]
        );
        Ok(())
    }

    #[test]
    fn non_public_class_yields_none() -> Result<()> {
        let bytes = class_bytes(ACC_SUPER, "org.example.Hidden", Some("java.lang.Object"), &[]);
        assert!(parse_header(&bytes)?.is_none());
        Ok(())
    }

    #[test]
    fn object_has_no_superclass() -> Result<()> {
        let bytes = class_bytes(ACC_PUBLIC, "java.lang.Object", None, &[]);
        let header = parse_header(&bytes)?.expect("Object is public");
        assert_eq!(header.superclass_name, None);
        Ok(())
    }

    #[test]
    fn bad_magic_is_an_error() {
        assert!(parse_header(&[0xDE, 0xAD, 0xBE, 0xEF, 0, 0, 0, 0]).is_err());
    }

    #[test]
    fn truncated_input_is_an_error() {
        let bytes = class_bytes(ACC_PUBLIC, "org.example.Foo", Some("java.lang.Object"), &[]);
        assert!(parse_header(&bytes[..bytes.len() - 3]).is_err());
    }

    #[test]
    fn dangling_constant_pool_index_is_an_error() {
        let mut out = Vec::new();
        out.extend(0xCAFE_BABEu32.to_be_bytes());
        out.extend([0u8, 0, 0, 52]);
        out.extend(1u16.to_be_bytes()); // empty constant pool
        out.extend(ACC_PUBLIC.to_be_bytes());
        out.extend(9u16.to_be_bytes()); // this_class points nowhere
        out.extend(0u16.to_be_bytes());
        out.extend(0u16.to_be_bytes());
        assert!(parse_header(&out).is_err());
    }
}
