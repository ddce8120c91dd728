mod revocation_tests;
