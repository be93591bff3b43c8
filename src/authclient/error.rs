pub mod createclienterror;
