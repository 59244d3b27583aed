use std::{fs::File, io::Write, path::PathBuf};
use structopt::StructOpt;

/// Export a page and everything it references as numbered objects.
#[derive(StructOpt, Debug)]
#[structopt(name = "pagegraft-export")]
struct Opt {
    /// Input file
    #[structopt(short, long, parse(from_os_str))]
    input: PathBuf,

    /// Output file
    #[structopt(short, long, parse(from_os_str))]
    output: PathBuf,

    /// Page index, starting at 0
    #[structopt(short, long, default_value = "0")]
    page: usize,

    /// First id to assign
    #[structopt(long, default_value = "1")]
    first_id: u32,
}

pub fn main() {
    env_logger::init();
    let opt = Opt::from_args();

    log::debug!("Read PDF file");
    let doc = match pagegraft::open(&opt.input) {
        Ok(doc) => doc,
        Err(e) => {
            log::error!("Error while opening: {}", e);
            return;
        }
    };

    let mut next = opt.first_id;
    let mut next_id = || {
        let id = next;
        next += 1;
        id
    };
    let exported = doc
        .page_object(opt.page)
        .and_then(|page| doc.export(&page, &mut next_id));
    let exported = match exported {
        Ok(exported) => exported,
        Err(e) => {
            log::error!("Error while exporting: {}", e);
            return;
        }
    };

    log::debug!("Encode {} objects", exported.len());
    let mut out = Vec::<u8>::new();
    for object in &exported {
        object.write_indirect(&mut out);
    }

    log::debug!("Write to file");
    let mut buffer = File::create(opt.output).expect("Could not create out file");
    buffer.write_all(&out).expect("Could not write out file");
}
