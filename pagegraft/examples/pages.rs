use std::path::PathBuf;
use structopt::StructOpt;

/// Print the media box and resources of every page.
#[derive(StructOpt, Debug)]
#[structopt(name = "pagegraft-pages")]
struct Opt {
    /// Input file
    #[structopt(short, long, parse(from_os_str))]
    input: PathBuf,

    /// Also print the decoded content streams
    #[structopt(short, long)]
    contents: bool,
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

    println!("PDF {}.{}, {} pages", doc.version().0, doc.version().1, doc.page_count());
    for index in 0..doc.page_count() {
        match doc.media_box(index) {
            Ok(r) => println!("page {}: [{} {} {} {}]", index, r.x1, r.y1, r.x2, r.y2),
            Err(e) => println!("page {}: {}", index, e),
        }
        let names = |dict: pagegraft::Result<pagegraft::Dictionary>| match dict {
            Ok(dict) => {
                let mut names: Vec<_> = dict.keys().map(|k| String::from_utf8_lossy(k).into_owned()).collect();
                names.sort();
                names.join(", ")
            }
            Err(e) => e.to_string(),
        };
        println!("  ExtGState: {}", names(doc.ext_g_state(index)));
        println!("  XObject: {}", names(doc.x_object(index)));

        if opt.contents {
            match doc.page_contents(index) {
                Ok(data) => println!("{}", String::from_utf8_lossy(&data)),
                Err(e) => log::error!("Error while decoding the contents: {}", e),
            }
        }
    }
}
