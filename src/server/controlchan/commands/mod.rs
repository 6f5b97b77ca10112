//! One handler per supported verb, each a small transaction over the
//! session, the sandboxed filesystem and the data channel.

mod appe;
mod cdup;
mod cwd;
mod dele;
mod eprt;
mod epsv;
mod feat;
mod list;
mod mdtm;
mod mkd;
mod nlst;
mod noop;
mod opts;
mod pass;
mod pasv;
mod port;
mod pwd;
mod rest;
mod retr;
mod rmd;
mod rnfr;
mod rnto;
mod size;
mod stat;
mod stor;
mod syst;
mod type_;
mod user;

pub(crate) use appe::Appe;
pub(crate) use cdup::Cdup;
pub(crate) use cwd::Cwd;
pub(crate) use dele::Dele;
pub(crate) use eprt::Eprt;
pub(crate) use epsv::Epsv;
pub(crate) use feat::Feat;
pub(crate) use list::List;
pub(crate) use mdtm::Mdtm;
pub(crate) use mkd::Mkd;
pub(crate) use nlst::Nlst;
pub(crate) use noop::Noop;
pub(crate) use opts::Opts;
pub(crate) use pass::Pass;
pub(crate) use pasv::Pasv;
pub(crate) use port::Port;
pub(crate) use pwd::Pwd;
pub(crate) use rest::Rest;
pub(crate) use retr::Retr;
pub(crate) use rmd::Rmd;
pub(crate) use rnfr::Rnfr;
pub(crate) use rnto::Rnto;
pub(crate) use size::Size;
pub(crate) use stat::Stat;
pub(crate) use stor::Stor;
pub(crate) use syst::Syst;
pub(crate) use type_::Type;
pub(crate) use user::User;
