mod export;
mod persistence;
mod run;
