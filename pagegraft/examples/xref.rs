use std::path::PathBuf;
use structopt::StructOpt;

/// Print the merged cross-reference table and trailer of the PDF file.
#[derive(StructOpt, Debug)]
#[structopt(name = "pagegraft-xref")]
struct Opt {
    /// Input file
    #[structopt(short, long, parse(from_os_str))]
    input: PathBuf,

    /// Print every object
    #[structopt(short, long)]
    objects: bool,
}

pub fn main() {
    env_logger::init();
    let opt = Opt::from_args();

    let doc = match pagegraft::open(&opt.input) {
        Ok(doc) => doc,
        Err(e) => {
            log::error!("Error while opening: {}", e);
            return;
        }
    };

    println!("root: {}", doc.root());
    for (key, value) in doc.trailer() {
        println!("trailer {}: {}", key, value);
    }
    for (id, offset) in doc.xref().iter() {
        println!("{:>6} {:010}", id, offset);
    }

    if opt.objects {
        for (id, object) in doc.objects() {
            println!("{} 0 obj {}", id, object);
        }
    }
}
